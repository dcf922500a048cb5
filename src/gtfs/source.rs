use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use reqwest::header::ACCEPT_ENCODING;
use tracing::debug;
use zip::{ZipArchive, read::ZipFile};

use crate::gtfs::{self, Source};

/// Tables stored as plain files in one directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl Source for DirSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, gtfs::Error> {
        let path = self.root.join(name);
        debug!("Reading {}", path.display());
        tokio::fs::read(&path).await.map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => gtfs::Error::FileNotFound(name.to_string()),
            _ => gtfs::Error::Io(err),
        })
    }
}

/// Tables packed in a GTFS zip archive.
#[derive(Debug, Clone)]
pub struct ZipSource {
    path: PathBuf,
}

impl ZipSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Source for ZipSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, gtfs::Error> {
        let path = self.path.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || read_from_zip(&path, &name)).await?
    }
}

fn read_from_zip(zip_path: &Path, file_name: &str) -> Result<Vec<u8>, gtfs::Error> {
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let mut file = get_file(&mut archive, file_name)?;
    let mut buf = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

fn get_file<'a>(
    archive: &'a mut ZipArchive<File>,
    name: &'a str,
) -> Result<ZipFile<'a, File>, gtfs::Error> {
    let index = archive
        .index_for_name(name)
        .ok_or(gtfs::Error::FileNotFound(name.to_string()))?;
    let file = archive.by_index(index)?;
    Ok(file)
}

/// Tables served below a base URL, e.g. the public folder of a web app.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client<S: Into<String>>(client: reqwest::Client, base_url: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

impl Source for HttpSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, gtfs::Error> {
        let url = format!("{}/{}", self.base_url, name);
        debug!("Fetching {url}");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT_ENCODING, "gzip, deflate")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(gtfs::Error::FileNotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(gtfs::Error::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Any of the sources above, picked from a location string.
#[derive(Debug, Clone)]
pub enum DataSource {
    Dir(DirSource),
    Zip(ZipSource),
    Http(HttpSource),
}

impl DataSource {
    /// `http(s)://` URLs are fetched, `.zip` paths are opened as archives,
    /// anything else is a directory.
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http(HttpSource::new(location))
        } else if location.to_ascii_lowercase().ends_with(".zip") {
            Self::Zip(ZipSource::new(location))
        } else {
            Self::Dir(DirSource::new(location))
        }
    }
}

impl Source for DataSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, gtfs::Error> {
        match self {
            Self::Dir(source) => source.fetch(name).await,
            Self::Zip(source) => source.fetch(name).await,
            Self::Http(source) => source.fetch(name).await,
        }
    }
}
