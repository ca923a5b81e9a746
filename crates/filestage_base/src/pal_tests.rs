/* 📖 # PAL Comprehensive Test Suite

This test module provides comprehensive testing of the PAL trait implementations.
The same lifecycle-relevant assertions run against both MockPal and RealPal
to ensure consistent behavior across implementations:

- create directory, then populate with create-new files
- flat listing of direct children
- three-way deletion classification (NotEmpty / success / NotFound)
*/

#[cfg(test)]
mod pal_trait_tests {
    use crate::pal::{FilePath, MockPal, Pal, PalHandle, RealPal};

    /// Walks the staging primitives every implementation must agree on.
    fn exercise_staging_primitives(pal: &PalHandle) {
        let parent = FilePath::from("staging");
        assert!(!pal.exists(&parent).unwrap());

        pal.create_directory_all(&parent).unwrap();
        assert!(pal.exists(&parent).unwrap());

        for i in 0..3 {
            pal.create_file(&parent.join(format!("hi{i}.txt"))).unwrap();
        }

        let entries: Vec<_> = pal
            .list_entries(&parent)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(entries.len(), 3);
        for entry in &entries {
            let meta = pal.metadata(entry).unwrap();
            assert!(meta.is_file);
            assert_eq!(meta.len, 0);
        }

        // Populated directory refuses non-recursive deletion.
        let err = pal.remove_directory(&parent).unwrap_err();
        assert!(err.is_not_empty());

        for entry in entries {
            pal.remove_file(&entry).unwrap();
        }
        pal.remove_directory(&parent).unwrap();

        // Absent directory classifies as NotFound, never silent success.
        let err = pal.remove_directory(&parent).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_staging_primitives_mock() {
        let pal = PalHandle::new(MockPal::new());
        exercise_staging_primitives(&pal);
    }

    #[test]
    fn test_staging_primitives_real() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let pal = PalHandle::new(RealPal::new(temp_dir.path().to_path_buf()));
        exercise_staging_primitives(&pal);
    }

    #[test]
    fn test_pal_handle_deref() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("test.txt"), b"content".to_vec());

        let handle = PalHandle::new(mock);
        assert!(handle.exists(&FilePath::from("test.txt")).unwrap());
    }

    #[test]
    fn test_read_file_default_impl() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("hello.txt"), b"Hello, World!".to_vec());

        let content = mock.read_file(&FilePath::from("hello.txt")).unwrap();
        assert_eq!(content, b"Hello, World!");
    }

    #[test]
    fn test_metadata_agrees_on_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let real = PalHandle::new(RealPal::new(temp_dir.path().to_path_buf()));
        let mock = PalHandle::new(MockPal::new());

        for pal in [&real, &mock] {
            pal.create_directory_all(&FilePath::from("staging")).unwrap();
            let meta = pal.metadata(&FilePath::from("staging")).unwrap();
            assert!(meta.is_directory);
            assert!(!meta.is_file);
        }
    }
}
