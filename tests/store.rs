mod tests {
    use tinypixel::{PixelStore, Rgb};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    #[test]
    fn test_unallocated_store_ignores_writes() {
        let mut store = PixelStore::<8>::new();
        assert!(!store.is_allocated());
        assert!(!store.set(0, RED));
        store.fill(RED);
        assert_eq!(store.len(), 0);
        assert_eq!(store.get(0), None);
        assert!(store.as_slice().is_empty());
    }

    #[test]
    fn test_allocate_zero_fills() {
        let mut store = PixelStore::<8>::new();
        assert_eq!(store.allocate(5), 5);
        assert_eq!(store.as_slice(), &[BLACK; 5]);
    }

    #[test]
    fn test_set_in_range() {
        let mut store = PixelStore::<8>::new();
        store.allocate(4);
        assert!(store.set(2, RED));
        assert_eq!(store.as_slice(), &[BLACK, BLACK, RED, BLACK]);
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut store = PixelStore::<8>::new();
        store.allocate(4);
        store.fill(BLUE);
        assert!(!store.set(4, RED));
        assert!(!store.set(usize::MAX, RED));
        assert_eq!(store.as_slice(), &[BLUE; 4]);
    }

    #[test]
    fn test_allocate_clamps_to_capacity() {
        let mut store = PixelStore::<8>::new();
        assert_eq!(store.allocate(20), 8);
        assert_eq!(store.len(), store.capacity());
    }

    #[test]
    fn test_reallocate_discards_contents() {
        let mut store = PixelStore::<8>::new();
        store.allocate(5);
        store.fill(RED);
        store.allocate(3);
        assert_eq!(store.as_slice(), &[BLACK; 3]);
    }

    #[test]
    fn test_free() {
        let mut store = PixelStore::<8>::new();
        store.allocate(3);
        store.free();
        assert!(!store.is_allocated());
        assert!(store.is_empty());
    }
}
