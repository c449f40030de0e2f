use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "voxnova";

/// Resolve the directory that receives access.log and application.log
///
/// Resolution order:
/// 1. Custom directory from parameter (if provided)
/// 2. VOXNOVA_LOG_DIR environment variable
/// 3. Platform default (system location when writable, then per-user)
/// 4. Temp directory as last resort
pub fn get_log_directory(custom_dir: Option<&str>) -> Result<PathBuf, std::io::Error> {
    if let Some(dir) = custom_dir {
        return ensure_directory_exists(PathBuf::from(dir));
    }

    if let Ok(dir) = env::var("VOXNOVA_LOG_DIR") {
        return ensure_directory_exists(PathBuf::from(dir));
    }

    ensure_directory_exists(platform_log_dir())
}

#[cfg(target_os = "windows")]
fn platform_log_dir() -> PathBuf {
    if let Ok(program_data) = env::var("ProgramData") {
        let path = PathBuf::from(program_data).join("VoxNova").join("logs");
        if can_create(&path) {
            return path;
        }
    }

    if let Some(local_app_data) = dirs::data_local_dir() {
        return local_app_data.join("VoxNova").join("logs");
    }

    env::temp_dir().join("voxnova_logs")
}

#[cfg(target_os = "macos")]
fn platform_log_dir() -> PathBuf {
    let system_dir = PathBuf::from("/var/log").join(APP_DIR);
    if can_create(&system_dir) {
        return system_dir;
    }

    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join("Library").join("Logs").join("VoxNova");
    }

    env::temp_dir().join("voxnova_logs")
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_log_dir() -> PathBuf {
    let system_dir = PathBuf::from("/var/log").join(APP_DIR);
    if can_create(&system_dir) {
        return system_dir;
    }

    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join(APP_DIR).join("logs");
    }

    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(".local").join(APP_DIR).join("logs");
    }

    env::temp_dir().join("voxnova_logs")
}

/// Check if a directory is writable by creating a scratch file
fn is_writable(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let scratch = path.join(".write_test");
    let ok = fs::write(&scratch, "test").is_ok();
    let _ = fs::remove_file(&scratch);
    ok
}

/// Existing and writable, or creatable under a writable parent
fn can_create(path: &Path) -> bool {
    if path.exists() {
        return is_writable(path);
    }
    path.parent().map(is_writable).unwrap_or(false)
}

fn ensure_directory_exists(path: PathBuf) -> Result<PathBuf, std::io::Error> {
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}
