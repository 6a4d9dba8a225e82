use heapless::Vec;

use crate::color::{BLACK, Rgb};

/// Optional buffer of pending pixel colors
///
/// CAPACITY is the largest strip the buffer can ever hold. Allocating sizes
/// the buffer to a pixel count within that capacity and fills it with black;
/// freeing drops it. Writes to a freed buffer or past its end are ignored.
#[derive(Debug, Default)]
pub struct PixelStore<const CAPACITY: usize> {
    pixels: Option<Vec<Rgb, CAPACITY>>,
}

impl<const CAPACITY: usize> PixelStore<CAPACITY> {
    pub const fn new() -> Self {
        Self { pixels: None }
    }

    /// Allocate a zeroed buffer of `count` pixels, discarding old contents
    ///
    /// Returns the number of pixels actually allocated, which is clamped to
    /// `CAPACITY`.
    pub fn allocate(&mut self, count: usize) -> usize {
        let count = count.min(CAPACITY);
        let mut pixels = Vec::new();
        // count <= CAPACITY, so this cannot fail
        let _ = pixels.resize(count, BLACK);
        self.pixels = Some(pixels);
        count
    }

    /// Drop the buffer
    pub fn free(&mut self) {
        self.pixels = None;
    }

    pub const fn is_allocated(&self) -> bool {
        self.pixels.is_some()
    }

    /// Number of pixels in the buffer, 0 if it is not allocated
    pub fn len(&self) -> usize {
        self.pixels.as_ref().map_or(0, |p| p.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Write a color at `index`
    ///
    /// Returns `false` if the buffer is absent or the index is out of range.
    pub fn set(&mut self, index: usize, color: Rgb) -> bool {
        let Some(slot) = self.pixels.as_mut().and_then(|p| p.get_mut(index)) else {
            return false;
        };
        *slot = color;
        true
    }

    /// Write the same color to every pixel
    pub fn fill(&mut self, color: Rgb) {
        if let Some(pixels) = self.pixels.as_mut() {
            pixels.fill(color);
        }
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.pixels.as_ref()?.get(index).copied()
    }

    /// Buffered pixels in index order; empty if the buffer is not allocated
    pub fn as_slice(&self) -> &[Rgb] {
        self.pixels.as_deref().unwrap_or(&[])
    }
}
