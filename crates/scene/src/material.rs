use glam::Vec4;

/// Entry points of the vertex and pixel stages a material draws with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub vertex_entry: String,
    pub fragment_entry: String,
}

impl ShaderProgram {
    /// The lit, textured program every demo material uses.
    pub fn lit() -> Self {
        Self {
            vertex_entry: "vs_main".into(),
            fragment_entry: "fs_main".into(),
        }
    }
}

impl Default for ShaderProgram {
    fn default() -> Self {
        Self::lit()
    }
}

/// Errors from texture construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture has zero extent ({width}x{height})")]
    ZeroExtent { width: u32, height: u32 },
    #[error("texture {width}x{height} needs {expected} RGBA8 bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// CPU-side RGBA8 texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureData {
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroExtent { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// 1x1 opaque white, bound for materials without a texture.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Shading state for a mesh: program pair, optional texture, optional color.
///
/// Immutable once built and shared by handle across entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    program: ShaderProgram,
    texture: Option<TextureData>,
    color: Option<Vec4>,
}

impl Material {
    pub fn new(name: impl Into<String>, program: ShaderProgram) -> Self {
        Self {
            name: name.into(),
            program,
            texture: None,
            color: None,
        }
    }

    pub fn with_texture(mut self, texture: TextureData) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn texture(&self) -> Option<&TextureData> {
        self.texture.as_ref()
    }

    pub fn color(&self) -> Option<Vec4> {
        self.color
    }

    /// Color multiplied into the sampled texel; white when none was given.
    pub fn tint(&self) -> Vec4 {
        self.color.unwrap_or(Vec4::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_size_checked() {
        assert!(TextureData::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            TextureData::from_rgba8(2, 2, vec![0; 15]).unwrap_err(),
            TextureError::SizeMismatch {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
        assert!(matches!(
            TextureData::from_rgba8(0, 4, Vec::new()),
            Err(TextureError::ZeroExtent { .. })
        ));
    }

    #[test]
    fn white_texture_is_one_opaque_pixel() {
        let t = TextureData::white();
        assert_eq!((t.width(), t.height()), (1, 1));
        assert_eq!(t.pixels(), &[255, 255, 255, 255]);
    }

    #[test]
    fn untinted_material_is_white() {
        let m = Material::new("base", ShaderProgram::lit());
        assert_eq!(m.tint(), Vec4::ONE);
        assert!(m.texture().is_none());
        assert!(m.color().is_none());
    }

    #[test]
    fn builder_sets_color_and_texture() {
        let blue = Vec4::new(0.15, 0.15, 1.0, 1.0);
        let m = Material::new("blue", ShaderProgram::lit())
            .with_color(blue)
            .with_texture(TextureData::white());
        assert_eq!(m.tint(), blue);
        assert_eq!(m.texture().map(TextureData::width), Some(1));
        assert_eq!(m.program().vertex_entry, "vs_main");
    }
}
