use tracing::warn;

use crate::client::CloudClient;
use crate::comments::decode::decode_comments;
use crate::comments::requests;
use crate::comments::types::CommentEntry;
use crate::context::RequestOptions;
use crate::error::DavError;

/// Comment threads attached to files, addressed by numeric file id (`oc:fileid`).
#[derive(Clone, Copy)]
pub struct CommentsClient<'a> {
    client: &'a CloudClient,
}

impl<'a> CommentsClient<'a> {
    pub(crate) fn new(client: &'a CloudClient) -> Self {
        Self { client }
    }

    pub async fn get_comments(
        &self,
        file_id: &str,
        opts: &RequestOptions,
    ) -> Result<Vec<CommentEntry>, DavError> {
        let opts = self.client.options(opts);
        let req = requests::get_comments(self.client.context(), &opts, file_id)?;
        let resp = self.client.perform(req).await?;
        let body = resp.body();
        if body.is_empty() {
            warn!(file_id, "comment listing came back without a body");
            return Err(DavError::MissingBody);
        }
        Ok(decode_comments(body))
    }

    pub async fn put_comment(
        &self,
        file_id: &str,
        message: &str,
        opts: &RequestOptions,
    ) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req = requests::put_comment(self.client.context(), &opts, file_id, message)?;
        self.client.perform(req).await?;
        Ok(())
    }

    pub async fn update_comment(
        &self,
        file_id: &str,
        message_id: &str,
        message: &str,
        opts: &RequestOptions,
    ) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req =
            requests::update_comment(self.client.context(), &opts, file_id, message_id, message)?;
        self.client.perform(req).await?;
        Ok(())
    }

    pub async fn delete_comment(
        &self,
        file_id: &str,
        message_id: &str,
        opts: &RequestOptions,
    ) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req = requests::delete_comment(self.client.context(), &opts, file_id, message_id)?;
        self.client.perform(req).await?;
        Ok(())
    }

    /// Set the read marker of the whole thread to now.
    pub async fn mark_as_read(&self, file_id: &str, opts: &RequestOptions) -> Result<(), DavError> {
        let opts = self.client.options(opts);
        let req = requests::mark_as_read(self.client.context(), &opts, file_id)?;
        self.client.perform(req).await?;
        Ok(())
    }
}
