// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cache generations on disk.
//!
//! Layout: `<root>/<generation>/<sha256(url)>.json` holds the URL, status,
//! and headers; `<sha256(url)>.body` holds the raw body. The metadata file
//! is written last, so an entry exists only once both files are complete.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use super::{CacheError, CacheResult, CacheStorage};
use crate::net::Response;

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    headers: Vec<(String, String)>,
}

/// Cache storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

fn entry_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> CacheError + '_ {
    move |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

async fn write_replace(path: &Path, contents: &[u8]) -> CacheResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).await.map_err(io_err(&tmp))?;
    fs::rename(&tmp, path).await.map_err(io_err(path))
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskCache { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generation_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    async fn read_meta(path: &Path) -> CacheResult<Option<EntryMeta>> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(path)(e)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| CacheError::Corrupted {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl CacheStorage for DiskCache {
    fn names(&self) -> BoxFuture<'_, CacheResult<Vec<String>>> {
        Box::pin(async move {
            let mut dir = match fs::read_dir(&self.root).await {
                Ok(dir) => dir,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(io_err(&self.root)(e)),
            };
            let mut names = Vec::new();
            while let Some(entry) = dir.next_entry().await.map_err(io_err(&self.root))? {
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            names.sort();
            Ok(names)
        })
    }

    fn delete<'a>(&'a self, name: &'a str) -> BoxFuture<'a, CacheResult<bool>> {
        Box::pin(async move {
            let dir = self.generation_dir(name);
            match fs::remove_dir_all(&dir).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(io_err(&dir)(e)),
            }
        })
    }

    fn lookup<'a>(
        &'a self,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, CacheResult<Option<Response>>> {
        Box::pin(async move {
            let dir = self.generation_dir(name);
            let key = entry_key(url);
            let Some(meta) = Self::read_meta(&dir.join(format!("{key}.json"))).await? else {
                return Ok(None);
            };
            let body_path = dir.join(format!("{key}.body"));
            let body = match fs::read(&body_path).await {
                Ok(body) => body,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(io_err(&body_path)(e)),
            };
            Ok(Some(Response {
                status: meta.status,
                headers: meta.headers,
                body,
            }))
        })
    }

    fn put<'a>(
        &'a self,
        name: &'a str,
        url: &'a str,
        response: Response,
    ) -> BoxFuture<'a, CacheResult<()>> {
        Box::pin(async move {
            let dir = self.generation_dir(name);
            fs::create_dir_all(&dir).await.map_err(io_err(&dir))?;

            let key = entry_key(url);
            let meta = EntryMeta {
                url: url.to_string(),
                status: response.status,
                headers: response.headers,
            };
            write_replace(&dir.join(format!("{key}.body")), &response.body).await?;
            write_replace(
                &dir.join(format!("{key}.json")),
                &serde_json::to_vec(&meta)?,
            )
            .await
        })
    }

    fn urls<'a>(&'a self, name: &'a str) -> BoxFuture<'a, CacheResult<Vec<String>>> {
        Box::pin(async move {
            let dir_path = self.generation_dir(name);
            let mut dir = match fs::read_dir(&dir_path).await {
                Ok(dir) => dir,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(io_err(&dir_path)(e)),
            };
            let mut urls = Vec::new();
            while let Some(entry) = dir.next_entry().await.map_err(io_err(&dir_path))? {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    if let Some(meta) = Self::read_meta(&path).await? {
                        urls.push(meta.url);
                    }
                }
            }
            urls.sort();
            Ok(urls)
        })
    }
}
