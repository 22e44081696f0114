/// Current drawable size of the surface in physical pixels.
///
/// Both sides are always at least 1; the backend rejects zero-sized surfaces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceExtent {
    width: u32,
    height: u32,
    aspect: f32,
}

impl SurfaceExtent {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            aspect: width as f32 / height as f32,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width / height`.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Applies a new size. Returns `false` when nothing changed.
    ///
    /// Width, height and aspect are all updated before returning, so readers
    /// never observe a partially applied resize.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let next = Self::new(width, height);
        if next.width == self.width && next.height == self.height {
            return false;
        }
        *self = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_width_over_height() {
        let e = SurfaceExtent::new(1280, 720);
        assert_eq!(e.aspect(), 1280.0 / 720.0);
    }

    #[test]
    fn resize_updates_all_fields() {
        let mut e = SurfaceExtent::new(800, 600);
        assert!(e.resize(300, 900));
        assert_eq!((e.width(), e.height()), (300, 900));
        assert_eq!(e.aspect(), 300.0 / 900.0);
    }

    #[test]
    fn resize_to_same_size_is_noop() {
        let mut e = SurfaceExtent::new(640, 480);
        assert!(!e.resize(640, 480));
        assert_eq!(e, SurfaceExtent::new(640, 480));
    }

    #[test]
    fn zero_sides_clamp_to_one() {
        let mut e = SurfaceExtent::new(0, 0);
        assert_eq!((e.width(), e.height()), (1, 1));
        assert_eq!(e.aspect(), 1.0);
        // 0x0 after clamping equals the current 1x1.
        assert!(!e.resize(0, 0));
        assert!(e.resize(10, 0));
        assert_eq!(e.aspect(), 10.0);
    }
}
