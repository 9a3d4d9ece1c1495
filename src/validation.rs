use bytes::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_NEARBY_LIMIT: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Latitude and longitude must be valid numbers")]
    NotANumber,
    #[error("Latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),
    #[error("Longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
    #[error("Maximum distance must be a positive number of kilometres")]
    InvalidDistance,
    #[error("File not found: {0}")]
    MissingFile(PathBuf),
    #[error("File is empty")]
    EmptyFile,
    #[error("File too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validates a coordinate pair.
    ///
    /// # Errors
    /// Returns an error if either value is not finite or is outside its range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ValidationError::NotANumber);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }
}

/// Parameters for a nearby-cities search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub at: Coordinates,
    pub limit: u32,
    pub max_distance_km: Option<f64>,
}

impl NearbyQuery {
    /// Builds a query; a zero or absent `limit` falls back to the default.
    ///
    /// # Errors
    /// Returns an error if `max_distance_km` is present but not a positive finite number.
    pub fn new(at: Coordinates, limit: Option<u32>, max_distance_km: Option<f64>) -> Result<Self, ValidationError> {
        if let Some(d) = max_distance_km
            && (!d.is_finite() || d <= 0.0)
        {
            return Err(ValidationError::InvalidDistance);
        }
        let limit = limit.filter(|&l| l > 0).unwrap_or(DEFAULT_NEARBY_LIMIT);
        Ok(Self { at, limit, max_distance_km })
    }
}

/// An image accepted for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub content: Bytes,
}

impl ImageUpload {
    /// Checks the file's size against `max_bytes` before reading it.
    ///
    /// # Errors
    /// Returns a validation error for a missing, empty or oversized file, or an I/O error if reading fails.
    pub async fn from_path(path: &Path, max_bytes: u64) -> Result<Self, crate::error::ClientError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(ValidationError::MissingFile(path.to_path_buf()).into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ValidationError::MissingFile(path.to_path_buf()).into());
            }
            Err(e) => return Err(crate::storage::StorageError::Io(e).into()),
        };
        check_size(metadata.len(), max_bytes)?;

        let content = tokio::fs::read(path).await.map_err(crate::storage::StorageError::Io)?;
        // Re-check in case the file changed between stat and read.
        check_size(content.len() as u64, max_bytes)?;

        let file_name = path.file_name().map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { mime: guess_mime(path), file_name, content: Bytes::from(content) })
    }
}

/// Rejects empty uploads and anything strictly larger than `max_bytes`.
///
/// # Errors
/// Returns `EmptyFile` or `FileTooLarge`.
pub const fn check_size(size: u64, max_bytes: u64) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::EmptyFile);
    }
    if size > max_bytes {
        return Err(ValidationError::FileTooLarge { size, max: max_bytes });
    }
    Ok(())
}

#[must_use]
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_MB: u64 = 10 * 1024 * 1024;

    #[test]
    fn test_coordinate_ranges() {
        assert!(Coordinates::new(39.9, 116.4).is_ok());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
        assert_eq!(Coordinates::new(91.0, 0.0), Err(ValidationError::LatitudeOutOfRange(91.0)));
        assert_eq!(Coordinates::new(0.0, 181.0), Err(ValidationError::LongitudeOutOfRange(181.0)));
        assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(ValidationError::NotANumber));
    }

    #[test]
    fn test_upload_size_limit() {
        assert!(check_size(TEN_MB, TEN_MB).is_ok());
        assert_eq!(check_size(TEN_MB + 1, TEN_MB), Err(ValidationError::FileTooLarge { size: TEN_MB + 1, max: TEN_MB }));
        assert_eq!(check_size(0, TEN_MB), Err(ValidationError::EmptyFile));
    }

    #[test]
    fn test_nearby_defaults() {
        let at = Coordinates::new(31.2, 121.5).unwrap();
        let query = NearbyQuery::new(at, None, None).unwrap();
        assert_eq!(query.limit, DEFAULT_NEARBY_LIMIT);

        let query = NearbyQuery::new(at, Some(0), Some(50.0)).unwrap();
        assert_eq!(query.limit, DEFAULT_NEARBY_LIMIT);
        assert_eq!(query.max_distance_km, Some(50.0));

        assert_eq!(NearbyQuery::new(at, Some(5), Some(-1.0)), Err(ValidationError::InvalidDistance));
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(guess_mime(Path::new("cat.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("shot.png")), "image/png");
        assert_eq!(guess_mime(Path::new("blob")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let path = std::env::temp_dir().join(format!("oversized-{}.jpg", uuid::Uuid::new_v4()));
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(TEN_MB + 1).unwrap();

        let res = ImageUpload::from_path(&path, TEN_MB).await;
        assert!(matches!(
            res,
            Err(crate::error::ClientError::Validation(ValidationError::FileTooLarge { size, .. })) if size == TEN_MB + 1
        ));

        std::fs::remove_file(path).unwrap();
    }
}
