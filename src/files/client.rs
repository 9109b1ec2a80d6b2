use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::client::CloudClient;
use crate::common::compression::{decompress_stream, detect_encodings};
use crate::context::RequestOptions;
use crate::error::DavError;
use crate::files::decode::{
    create_folder_result, decode_files, decode_trash, download_result, upload_result,
};
use crate::files::requests;
use crate::files::types::{
    CreateFolderResult, DateProperty, DownloadResult, FileEntry, LiteralSearch, MediaSearch,
    ReadResult, SearchDate, TrashEntry, UploadResult,
};
use crate::request::{DavRequest, normalize_for_depth};
use crate::webdav::types::Depth;

/// File operations below the user's files root.
///
/// Paths are relative to that root (`"Photos/2021"`, `"/docs/report.pdf"`),
/// unencoded.
#[derive(Clone, Copy)]
pub struct FilesClient<'a> {
    client: &'a CloudClient,
}

/// A successful listing must carry a body.
fn require_body(body: &Bytes) -> Result<(), DavError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DavError::MissingBody);
    }
    Ok(())
}

impl<'a> FilesClient<'a> {
    pub(crate) fn new(client: &'a CloudClient) -> Self {
        Self { client }
    }

    // ----------- Collections and resources -----------

    /// `MKCOL`. Returns the new folder's `oc-fileid` and the server's `Date`.
    pub async fn create_folder(
        &self,
        path: &str,
        opts: &RequestOptions,
    ) -> Result<CreateFolderResult, DavError> {
        let opts = self.client.options(opts);
        let req = requests::create_folder(self.client.context(), &opts, path)?;
        let resp = self.client.perform(req).await?;
        create_folder_result(resp.headers())
    }

    pub async fn delete(&self, path: &str, opts: &RequestOptions) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req = requests::delete(self.client.context(), &opts, path)?;
        self.client.perform(req).await?;
        Ok(())
    }

    pub async fn move_item(
        &self,
        source: &str,
        destination: &str,
        overwrite: bool,
        opts: &RequestOptions,
    ) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req =
            requests::move_item(self.client.context(), &opts, source, destination, overwrite)?;
        self.client.perform(req).await?;
        Ok(())
    }

    pub async fn copy_item(
        &self,
        source: &str,
        destination: &str,
        overwrite: bool,
        opts: &RequestOptions,
    ) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req =
            requests::copy_item(self.client.context(), &opts, source, destination, overwrite)?;
        self.client.perform(req).await?;
        Ok(())
    }

    /// `PROPFIND` on `path`.
    ///
    /// With [`Depth::One`] the result lists the folder itself followed by its
    /// children; use [`ReadResult::children`] to skip the former. `body`
    /// replaces the default property request.
    pub async fn read_file_or_folder(
        &self,
        path: &str,
        depth: Depth,
        show_hidden: bool,
        body: Option<&str>,
        opts: &RequestOptions,
    ) -> Result<ReadResult, DavError> {
        let ctx = self.client.context();
        let opts = self.client.options(opts);
        let req = requests::read_file_or_folder(ctx, &opts, path, depth, body)?;
        let resp = self.client.perform(req).await?;

        let data = resp.into_body();
        require_body(&data)?;
        let files = decode_files(&data, show_hidden);
        debug!(path, count = files.len(), "folder read");

        Ok(ReadResult {
            files,
            data,
            request_path: normalize_for_depth(&ctx.files_path(path), depth),
        })
    }

    // ----------- Search -----------

    /// `SEARCH` with a caller-built `basicsearch` document.
    pub async fn search_body_request(
        &self,
        body: String,
        show_hidden: bool,
        opts: &RequestOptions,
    ) -> Result<Vec<FileEntry>, DavError> {
        let opts = self.client.options(opts);
        let req = requests::search_body(self.client.context(), &opts, body)?;
        self.listing(req, show_hidden).await
    }

    /// Files whose display name contains `literal`.
    pub async fn search_literal(
        &self,
        literal: &str,
        depth: Depth,
        show_hidden: bool,
        opts: &RequestOptions,
    ) -> Result<Vec<FileEntry>, DavError> {
        let opts = self.client.options(opts);
        let search = LiteralSearch {
            literal: literal.to_string(),
            depth,
        };
        let req = requests::search_literal(self.client.context(), &opts, &search)?;
        self.listing(req, show_hidden).await
    }

    /// Images and videos below `path` dated strictly between `greater_than` and `less_than`, newest first.
    #[allow(clippy::too_many_arguments)]
    pub async fn search_media(
        &self,
        path: &str,
        less_than: impl Into<SearchDate>,
        greater_than: impl Into<SearchDate>,
        element_date: DateProperty,
        limit: u32,
        show_hidden: bool,
        opts: &RequestOptions,
    ) -> Result<Vec<FileEntry>, DavError> {
        let search = MediaSearch {
            path: path.to_string(),
            less_than: less_than.into(),
            greater_than: greater_than.into(),
            element_date,
            limit,
        };
        self.search_media_with(&search, show_hidden, opts).await
    }

    pub async fn search_media_with(
        &self,
        search: &MediaSearch,
        show_hidden: bool,
        opts: &RequestOptions,
    ) -> Result<Vec<FileEntry>, DavError> {
        let opts = self.client.options(opts);
        let req = requests::search_media(self.client.context(), &opts, search)?;
        self.listing(req, show_hidden).await
    }

    // ----------- Favorites -----------

    pub async fn set_favorite(
        &self,
        file_name: &str,
        favorite: bool,
        opts: &RequestOptions,
    ) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req = requests::set_favorite(self.client.context(), &opts, file_name, favorite)?;
        self.client.perform(req).await?;
        Ok(())
    }

    pub async fn list_favorites(
        &self,
        show_hidden: bool,
        opts: &RequestOptions,
    ) -> Result<Vec<FileEntry>, DavError> {
        let opts = self.client.options(opts);
        let req = requests::list_favorites(self.client.context(), &opts)?;
        self.listing(req, show_hidden).await
    }

    // ----------- Trash -----------

    pub async fn list_trash(
        &self,
        show_hidden: bool,
        opts: &RequestOptions,
    ) -> Result<Vec<TrashEntry>, DavError> {
        let opts = self.client.options(opts);
        let req = requests::list_trash(self.client.context(), &opts)?;
        let resp = self.client.perform(req).await?;
        let body = resp.body();
        require_body(body)?;
        Ok(decode_trash(body, show_hidden))
    }

    // ----------- Transfers -----------

    /// `GET` `path` into `local`, replacing any existing file and creating
    /// missing parent directories. The body is decoded while it streams.
    ///
    /// The body lands in a temporary file next to `local` that is renamed
    /// over it once complete; on failure `local` is left as it was.
    pub async fn download(
        &self,
        path: &str,
        local: impl AsRef<Path>,
        opts: &RequestOptions,
    ) -> Result<DownloadResult, DavError> {
        let local = local.as_ref();
        let opts = self.client.options(opts);
        let req = requests::download(self.client.context(), &opts, path)?;
        let resp = self.client.perform_stream(req).await?;

        let dir = match local.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DavError::local_write(dir, e))?;
        let (std_file, part) = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| DavError::local_write(local, e))?
            .into_parts();
        let mut file = tokio::fs::File::from_std(std_file);

        let encodings = detect_encodings(resp.headers());
        let (parts, body) = resp.into_parts();
        let mut reader = decompress_stream(body, &encodings);

        let mut written: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = reader
                .read(&mut buf)
                .await
                .map_err(|e| DavError::from_body_read(&e))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .await
                .map_err(|e| DavError::local_write(local, e))?;
            written += n as u64;
        }
        file.flush()
            .await
            .map_err(|e| DavError::local_write(local, e))?;
        drop(file);

        // Dropping `part` on any earlier return removes the temporary file.
        part.persist(local)
            .map_err(|e| DavError::local_write(local, e.error))?;

        debug!(path, bytes = written, "download finished");
        let mut headers = parts.headers;
        if !encodings.is_empty() {
            // The stored length is the decoded one.
            headers.remove(hyper::header::CONTENT_LENGTH);
            headers.remove(hyper::header::CONTENT_ENCODING);
        }
        Ok(download_result(&headers, written))
    }

    /// `PUT` the content of `local` to `path`, streamed from disk.
    ///
    /// Dates are sent as `X-OC-CTime`/`X-OC-MTime` so the server keeps them.
    pub async fn upload(
        &self,
        path: &str,
        local: impl AsRef<Path>,
        creation_date: Option<DateTime<Utc>>,
        modification_date: Option<DateTime<Utc>>,
        opts: &RequestOptions,
    ) -> Result<UploadResult, DavError> {
        let local = local.as_ref();
        let size = tokio::fs::metadata(local)
            .await
            .map_err(|e| DavError::local_read(local, e))?
            .len();

        let opts = self.client.options(opts);
        let req = requests::upload(
            self.client.context(),
            &opts,
            path,
            local,
            creation_date,
            modification_date,
        )?;
        let resp = self.client.perform(req).await?;
        debug!(path, bytes = size, "upload finished");
        upload_result(resp.headers(), size)
    }

    async fn listing(
        &self,
        req: DavRequest,
        show_hidden: bool,
    ) -> Result<Vec<FileEntry>, DavError> {
        let resp = self.client.perform(req).await?;
        let body = resp.body();
        require_body(body)?;
        Ok(decode_files(body, show_hidden))
    }
}
