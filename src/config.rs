use std::path::PathBuf;

/// PlatformIO environment the project builds by default.
pub const DEFAULT_ENV_NAME: &str = "seeed_xiao_esp32s3";

/// Explicit configuration handed to each build step.
///
/// The orchestrator assembles one of these per invocation and passes it
/// into the steps it runs; the steps themselves share no mutable state.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Root of the firmware project (the directory holding
    /// `platformio.ini` and `partitions.csv`).
    pub project_dir: PathBuf,
    /// PlatformIO environment name, used to locate build artifacts.
    pub env_name: String,
    /// objdump binary used to list ELF sections.
    pub objdump: String,
    /// size binary used as a fallback when objdump is unavailable.
    pub size_tool: String,
}

impl BuildConfig {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(project_dir: P, env_name: S) -> Self {
        Self {
            project_dir: project_dir.into(),
            env_name: env_name.into(),
            objdump: "xtensa-esp32s3-elf-objdump".to_string(),
            size_tool: "xtensa-esp32s3-elf-size".to_string(),
        }
    }

    /// The PlatformIO build output directory, `.pio/build/<env>`.
    pub fn build_dir(&self) -> PathBuf {
        self.project_dir.join(".pio").join("build").join(&self.env_name)
    }

    /// The compiled firmware ELF.
    pub fn firmware_elf(&self) -> PathBuf {
        self.build_dir().join("firmware.elf")
    }

    /// The built filesystem image.
    pub fn fs_image(&self) -> PathBuf {
        self.build_dir().join("littlefs.bin")
    }

    /// The partition CSV source of truth.
    pub fn partition_csv(&self) -> PathBuf {
        self.project_dir.join("partitions.csv")
    }

    /// Human-authored web assets, staged into [`Self::data_dir`].
    pub fn static_dir(&self) -> PathBuf {
        self.project_dir.join("static")
    }

    /// The filesystem image source tree.
    pub fn data_dir(&self) -> PathBuf {
        self.project_dir.join("data")
    }
}
