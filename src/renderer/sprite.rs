//! Sprite instance batching
//!
//! [`SpriteBatch`] is a recording [`Renderer`]: each draw call becomes a
//! packed [`SpriteInstance`] that a GPU backend can upload as-is.

use bytemuck::{Pod, Zeroable};

use super::{Graphic, Renderer};

/// One queued frame blit
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub frame: u32,
    /// Index into the batch's sheet table
    pub sheet: u32,
}

impl SpriteInstance {
    pub const fn new(x: f32, y: f32, w: f32, h: f32, frame: u32, sheet: u32) -> Self {
        Self {
            position: [x, y],
            size: [w, h],
            frame,
            sheet,
        }
    }
}

/// Draw calls collected for one frame
#[derive(Debug, Default)]
pub struct SpriteBatch {
    instances: Vec<SpriteInstance>,
    sheets: Vec<String>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop recorded instances, keeping the sheet table
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    /// Sheet name for an instance's `sheet` index
    pub fn sheet_name(&self, sheet: u32) -> Option<&str> {
        self.sheets.get(sheet as usize).map(String::as_str)
    }

    /// Number of instances drawn from the named sheet
    pub fn count_sheet(&self, name: &str) -> usize {
        match self.sheets.iter().position(|s| s == name) {
            Some(idx) => self
                .instances
                .iter()
                .filter(|i| i.sheet == idx as u32)
                .count(),
            None => 0,
        }
    }

    /// Raw instance bytes for a buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    fn sheet_index(&mut self, name: &str) -> u32 {
        if let Some(idx) = self.sheets.iter().position(|s| s == name) {
            return idx as u32;
        }
        self.sheets.push(name.to_string());
        (self.sheets.len() - 1) as u32
    }
}

impl Renderer for SpriteBatch {
    fn draw_frame(&mut self, graphic: &Graphic, frame: usize, x: i32, y: i32) {
        let sheet = self.sheet_index(&graphic.name);
        self.instances.push(SpriteInstance::new(
            x as f32,
            y as f32,
            graphic.frame_width as f32,
            graphic.frame_height as f32,
            frame as u32,
            sheet,
        ));
    }
}
