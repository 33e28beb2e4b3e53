//! The [`Gpu`] trait, the seam through which GPU object lifetimes flow.
//!
//! Every buffer, vertex array and texture the viewer owns is created and released through this
//! trait. The real implementation forwards to [`glow::Context`]; tests use a recording backend to
//! check that every handle created during load is released exactly once.

use glow::HasContext;

use crate::abs::texture::{TextureImage, TextureUpload};

/// A vertex attribute sourced from its own tightly packed `f32` buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexAttribute<B> {
    /// Shader input slot.
    pub location: u32,
    /// Number of `f32` components per vertex.
    pub components: i32,
    pub buffer: B,
}

/// Creation, release and use of GPU objects.
pub trait Gpu {
    type BufferId: Copy + std::fmt::Debug + PartialEq;
    type VertexArrayId: Copy + std::fmt::Debug + PartialEq;
    type TextureId: Copy + std::fmt::Debug + PartialEq;

    /// Creates a static buffer and uploads `data` into it verbatim.
    fn upload_buffer(&self, data: &[u8]) -> Result<Self::BufferId, String>;

    fn release_buffer(&self, buffer: Self::BufferId);

    /// Creates a vertex array binding each attribute to its buffer, with `index_buffer` as the
    /// element buffer.
    fn upload_vertex_array(
        &self,
        attributes: &[VertexAttribute<Self::BufferId>],
        index_buffer: Self::BufferId,
    ) -> Result<Self::VertexArrayId, String>;

    fn release_vertex_array(&self, vertex_array: Self::VertexArrayId);

    /// Creates a mipmapped, repeating 2D texture from `image` using the given upload path.
    fn upload_texture(
        &self,
        image: &TextureImage,
        upload: &TextureUpload,
    ) -> Result<Self::TextureId, String>;

    fn release_texture(&self, texture: Self::TextureId);

    /// Binds a texture to the given texture unit.
    fn bind_texture_unit(&self, texture: Self::TextureId, unit: u32);

    /// Draws `index_count` `u32` indices as triangles.
    fn draw_indexed_triangles(&self, vertex_array: Self::VertexArrayId, index_count: usize);
}

impl Gpu for glow::Context {
    type BufferId = glow::NativeBuffer;
    type VertexArrayId = glow::NativeVertexArray;
    type TextureId = glow::NativeTexture;

    fn upload_buffer(&self, data: &[u8]) -> Result<glow::NativeBuffer, String> {
        unsafe {
            let buffer = self.create_buffer()?;
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn release_buffer(&self, buffer: glow::NativeBuffer) {
        unsafe {
            self.delete_buffer(buffer);
        }
    }

    fn upload_vertex_array(
        &self,
        attributes: &[VertexAttribute<glow::NativeBuffer>],
        index_buffer: glow::NativeBuffer,
    ) -> Result<glow::NativeVertexArray, String> {
        unsafe {
            let vao = self.create_vertex_array()?;
            self.bind_vertex_array(Some(vao));

            for attribute in attributes {
                self.bind_buffer(glow::ARRAY_BUFFER, Some(attribute.buffer));
                self.enable_vertex_attrib_array(attribute.location);
                self.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    0,
                    0,
                );
            }

            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));

            // The element buffer binding is recorded in the VAO, so unbind the VAO first.
            self.bind_vertex_array(None);
            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            self.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(vao)
        }
    }

    fn release_vertex_array(&self, vertex_array: glow::NativeVertexArray) {
        unsafe {
            self.delete_vertex_array(vertex_array);
        }
    }

    fn upload_texture(
        &self,
        image: &TextureImage,
        upload: &TextureUpload,
    ) -> Result<glow::NativeTexture, String> {
        unsafe {
            let texture = self.create_texture()?;
            self.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                upload.internal_format as i32,
                image.width as i32,
                image.height as i32,
                0,
                upload.format,
                upload.data_type,
                glow::PixelUnpackData::Slice(Some(image.pixels.as_slice())),
            );
            self.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
            self.generate_mipmap(glow::TEXTURE_2D);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            self.bind_texture(glow::TEXTURE_2D, None);
            Ok(texture)
        }
    }

    fn release_texture(&self, texture: glow::NativeTexture) {
        unsafe {
            self.delete_texture(texture);
        }
    }

    fn bind_texture_unit(&self, texture: glow::NativeTexture, unit: u32) {
        unsafe {
            self.active_texture(glow::TEXTURE0 + unit);
            self.bind_texture(glow::TEXTURE_2D, Some(texture));
        }
    }

    fn draw_indexed_triangles(&self, vertex_array: glow::NativeVertexArray, index_count: usize) {
        unsafe {
            self.bind_vertex_array(Some(vertex_array));
            self.draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
            self.bind_vertex_array(None);
        }
    }
}
