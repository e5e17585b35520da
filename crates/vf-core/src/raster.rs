//! In-memory raster surface and its identity-compared handle

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// A live RGBA raster surface backing the canvas layer.
///
/// Exactly one logical writer exists (the mark collaborator, which draws
/// into it); the compositor and host only read.
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Mutex<Vec<u8>>,
}

impl RasterSurface {
    /// Allocate a zeroed surface of the given pixel dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Mutex::new(vec![0; width as usize * height as usize * 4]),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to transparent black
    pub fn clear(&self) {
        self.pixels.lock().fill(0);
    }

    /// Flood the surface with one color
    pub fn fill(&self, rgba: [u8; 4]) {
        let mut pixels = self.pixels.lock();
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Write one pixel; out-of-bounds writes are ignored
    pub fn put_pixel(&self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        self.pixels.lock()[offset..offset + 4].copy_from_slice(&rgba);
    }

    /// Read one pixel, if in bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let pixels = self.pixels.lock();
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&pixels[offset..offset + 4]);
        Some(rgba)
    }
}

/// Nullable reference to a live raster surface.
///
/// Handles are identity-compared, never value-compared: two handles are
/// the same only when they point at the same surface allocation.
#[derive(Clone)]
pub struct CanvasHandle(Arc<RasterSurface>);

impl CanvasHandle {
    /// Wrap a freshly mounted surface
    pub fn new(surface: RasterSurface) -> Self {
        Self(Arc::new(surface))
    }

    /// Allocate a surface matching the frame size in whole pixels
    pub fn for_size(size: [f64; 2]) -> Self {
        Self::new(RasterSurface::new(
            size[0].round().max(1.0) as u32,
            size[1].round().max(1.0) as u32,
        ))
    }

    /// The surface this handle points at
    pub fn surface(&self) -> &RasterSurface {
        &self.0
    }

    /// Whether this surface's pixel dimensions match the frame size
    pub fn matches_size(&self, size: [f64; 2]) -> bool {
        self.0.width == size[0].round().max(1.0) as u32
            && self.0.height == size[1].round().max(1.0) as u32
    }

    /// Identity comparison, not value comparison
    pub fn same_identity(&self, other: &CanvasHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity comparison over nullable handles
    pub fn same_identity_opt(a: Option<&CanvasHandle>, b: Option<&CanvasHandle>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_identity(b),
            _ => false,
        }
    }
}

impl fmt::Debug for CanvasHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanvasHandle({}x{})", self.0.width, self.0.height)
    }
}
