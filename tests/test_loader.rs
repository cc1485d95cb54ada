mod common;

use detectlens::DecodeError;
use detectlens::loader::{load, load_bytes};

use common::*;

#[tokio::test]
async fn test_load_reports_natural_size() -> anyhow::Result<()> {
    let img_file = create_test_image(120, 80);

    let loaded = load(img_file.path()).await?;

    assert_eq!(loaded.natural, Size::new(120, 80));
    assert_eq!(loaded.image.width(), 120);
    assert_eq!(loaded.image.height(), 80);
    assert_eq!(loaded.path, img_file.path());
    assert!(!loaded.bytes.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_non_image_is_rejected() {
    let file = create_non_image_file();

    let result = load(file.path()).await;

    assert!(matches!(result, Err(DecodeError::Unsupported { .. })));
}

#[tokio::test]
async fn test_missing_file_is_a_read_error() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;

    let result = load(dir.path().join("missing.png")).await;

    assert!(matches!(result, Err(DecodeError::Read { .. })));
    Ok(())
}

#[tokio::test]
async fn test_truncated_image_fails_to_decode() -> anyhow::Result<()> {
    let img_file = create_test_image(50, 50);
    let bytes = std::fs::read(img_file.path())?;

    // PNG signature survives, pixel data does not
    let result = load_bytes(bytes[..24].to_vec()).await;

    assert!(matches!(result, Err(DecodeError::Decode { .. })));
    Ok(())
}

#[tokio::test]
async fn test_load_bytes_decodes_in_memory_image() -> anyhow::Result<()> {
    let img_file = create_test_image(33, 17);
    let bytes = std::fs::read(img_file.path())?;

    let loaded = load_bytes(bytes).await?;

    assert_eq!(loaded.natural, Size::new(33, 17));
    Ok(())
}
