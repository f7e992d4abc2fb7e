use std::path::Path;

use tokio::fs;

use crate::utils::error::PagetocError;

/// Create a directory and any parent directories if they don't exist
pub async fn create_directory<P: AsRef<Path>>(path: P) -> Result<(), PagetocError> {
    fs::create_dir_all(path.as_ref()).await?;
    Ok(())
}

/// Read a file to string
pub async fn read_file<P: AsRef<Path>>(path: P) -> Result<String, PagetocError> {
    Ok(fs::read_to_string(path.as_ref()).await?)
}

/// Write a string to a file, creating parent directories first
pub async fn write_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), PagetocError> {
    if let Some(parent) = path.as_ref().parent() {
        create_directory(parent).await?;
    }
    fs::write(path.as_ref(), contents).await?;
    Ok(())
}

/// Copy a file, creating parent directories of the destination first
pub async fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> Result<u64, PagetocError> {
    if let Some(parent) = to.as_ref().parent() {
        create_directory(parent).await?;
    }
    Ok(fs::copy(from.as_ref(), to.as_ref()).await?)
}
