/// Entry points defined by [`LIT_SHADER`], as `(vertex, fragment)` pairs.
pub const LIT_ENTRY_POINTS: &[(&str, &str)] = &[("vs_main", "fs_main")];

/// Number of directional lights the lit shader reads.
pub const MAX_LIGHTS: usize = 2;

/// WGSL shader for textured, tinted meshes lit by two directional lights.
pub const LIT_SHADER: &str = r#"
struct Light {
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    direction: vec4<f32>,
};

struct Frame {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    lights: array<Light, 2>,
};

struct Model {
    world: mat4x4<f32>,
};

struct SurfaceParams {
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> model: Model;

@group(2) @binding(0)
var base_texture: texture_2d<f32>;
@group(2) @binding(1)
var base_sampler: sampler;
@group(2) @binding(2)
var<uniform> surface_params: SurfaceParams;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = model.world * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.projection * frame.view * world_pos;
    out.world_normal = (model.world * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    return out;
}

fn directional(light: Light, normal: vec3<f32>) -> vec4<f32> {
    let to_light = normalize(-light.direction.xyz);
    let amount = saturate(dot(normal, to_light));
    return light.ambient + light.diffuse * amount;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    let texel = textureSample(base_texture, base_sampler, in.uv) * surface_params.color;
    let lit = directional(frame.lights[0], normal) + directional(frame.lights[1], normal);
    return vec4<f32>(texel.rgb * lit.rgb, texel.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_present() {
        for (vs, fs) in LIT_ENTRY_POINTS {
            assert!(LIT_SHADER.contains(&format!("fn {vs}(")));
            assert!(LIT_SHADER.contains(&format!("fn {fs}(")));
        }
    }

    #[test]
    fn light_array_matches_max_lights() {
        assert!(LIT_SHADER.contains(&format!("array<Light, {MAX_LIGHTS}>")));
    }
}
