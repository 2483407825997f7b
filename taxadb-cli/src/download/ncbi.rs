//! Download client for the NCBI taxonomy file server

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tar::Archive;
use taxadb_core::config::DownloadConfig;
use taxadb_core::{NCBIDataset, TaxadbError, TaxadbResult};
use tracing::{debug, info};

/// Client for downloading taxonomy files from NCBI
pub struct NCBIDownloader {
    client: Client,
    base_url: String,
}

impl NCBIDownloader {
    pub fn new(config: &DownloadConfig) -> TaxadbResult<Self> {
        let client = Client::builder()
            .user_agent(format!("taxadb/{}", taxadb_core::VERSION))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TaxadbError::Network(e.to_string()))?;

        Ok(NCBIDownloader {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one dataset plus its `.md5` companion into `outdir` and
    /// verify the payload against the published digest.
    ///
    /// Files already present are reused unless `force` is set. Returns
    /// the path of the verified payload.
    pub fn fetch(&self, dataset: NCBIDataset, outdir: &Path, force: bool) -> TaxadbResult<PathBuf> {
        let url = format!("{}/{}", self.base_url, dataset.remote_path());
        let dest = outdir.join(dataset.file_name());
        let companion = md5_companion_path(&dest);

        if force || !dest.exists() {
            self.download_file(&url, &dest)?;
        } else {
            info!("{} already present, skipping download", dest.display());
        }
        if force || !companion.exists() {
            self.download_file(&format!("{}.md5", url), &companion)?;
        }

        if let Err(e) = verify_md5(&dest) {
            // A corrupt payload is useless, drop it so a re-run starts clean
            let _ = std::fs::remove_file(&dest);
            return Err(e);
        }
        Ok(dest)
    }

    fn download_file(&self, url: &str, dest: &Path) -> TaxadbResult<()> {
        debug!("downloading {} to {}", url, dest.display());
        let temp_path = dest.with_extension("tmp");

        // Resume an interrupted transfer when the server cooperates
        let mut resume_from = 0u64;
        if temp_path.exists() {
            resume_from = std::fs::metadata(&temp_path)?.len();
        }

        let mut request = self.client.get(url);
        if resume_from > 0 {
            request = request.header("Range", format!("bytes={}-", resume_from));
        }

        let mut response = request
            .send()
            .map_err(|e| TaxadbError::Network(format!("{}: {}", url, e)))?;

        let resumed = response.status() == StatusCode::PARTIAL_CONTENT;
        if !response.status().is_success() {
            return Err(TaxadbError::Network(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        if resume_from > 0 && !resumed {
            // Server ignored the Range header, start over
            resume_from = 0;
            let _ = std::fs::remove_file(&temp_path);
        }

        let total_size = response.content_length().unwrap_or(0) + resume_from;
        let pb = byte_progress(total_size);
        pb.set_position(resume_from);

        let mut file = if resume_from > 0 {
            std::fs::OpenOptions::new().append(true).open(&temp_path)?
        } else {
            File::create(&temp_path)?
        };

        let mut buffer = [0u8; 8192];
        loop {
            let read = response
                .read(&mut buffer)
                .map_err(|e| TaxadbError::Network(format!("{}: {}", url, e)))?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])?;
            pb.inc(read as u64);
        }
        file.flush()?;
        drop(file);

        std::fs::rename(&temp_path, dest)?;
        pb.finish_and_clear();

        info!("downloaded {}", dest.display());
        Ok(())
    }
}

fn byte_progress(total_size: u64) -> ProgressBar {
    if total_size > 0 {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .unwrap()
                .progress_chars("=>-"),
        );
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {bytes} ({bytes_per_sec})")
                .unwrap(),
        );
        pb
    }
}

/// Path of the digest file published next to each download
pub fn md5_companion_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".md5");
    PathBuf::from(name)
}

/// Compare a file against the digest in its `.md5` companion.
///
/// NCBI companions carry `<digest>  <filename>`; only the first
/// whitespace-separated token counts.
pub fn verify_md5(path: &Path) -> TaxadbResult<()> {
    let companion = md5_companion_path(path);
    let companion_text = std::fs::read_to_string(&companion).map_err(|e| {
        TaxadbError::Checksum(format!("cannot read {}: {}", companion.display(), e))
    })?;
    let expected = companion_text
        .split_whitespace()
        .next()
        .ok_or_else(|| TaxadbError::Checksum(format!("{} is empty", companion.display())))?;

    let actual = file_md5(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(TaxadbError::Checksum(format!(
            "{}: expected {}, got {}",
            path.display(),
            expected,
            actual
        )));
    }
    debug!("checksum verified for {}", path.display());
    Ok(())
}

fn file_md5(path: &Path) -> TaxadbResult<String> {
    let mut file = File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        context.consume(&buffer[..read]);
    }
    let digest: md5::Digest = context.into();
    Ok(format!("{:x}", digest))
}

/// Unpack a gzip tar archive into `dest_dir`
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> TaxadbResult<()> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);
    archive.unpack(dest_dir)?;
    info!(
        "unpacked {} into {}",
        archive_path.display(),
        dest_dir.display()
    );
    Ok(())
}
