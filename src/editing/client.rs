use tracing::debug;

use crate::client::CloudClient;
use crate::context::RequestOptions;
use crate::editing::json::{decode_editor_details, decode_templates, decode_url};
use crate::editing::requests::{self, DEFAULT_TEMPLATE_CREATOR, DEFAULT_TEMPLATE_EDITOR};
use crate::editing::types::{EditorDetails, TemplateDescriptor};
use crate::error::DavError;

/// OCS direct editing: discover editors, open files, create documents.
///
/// A response without `ocs.data` is not an error; it yields empty results.
#[derive(Clone, Copy)]
pub struct EditingClient<'a> {
    client: &'a CloudClient,
}

impl<'a> EditingClient<'a> {
    pub(crate) fn new(client: &'a CloudClient) -> Self {
        Self { client }
    }

    pub async fn editor_details(&self, opts: &RequestOptions) -> Result<EditorDetails, DavError> {
        let opts = self.client.options(opts);
        let req = requests::editor_details(self.client.context(), &opts)?;
        let resp = self.client.perform(req).await?;
        let details = decode_editor_details(resp.body());
        debug!(
            editors = details.editors.len(),
            creators = details.creators.len(),
            "editor details"
        );
        Ok(details)
    }

    /// URL of an editing session for `path`; empty if the server sent none.
    pub async fn open_file(
        &self,
        path: &str,
        editor_id: &str,
        opts: &RequestOptions,
    ) -> Result<String, DavError> {
        let opts = self.client.options(opts);
        let req = requests::open_file(self.client.context(), &opts, path, editor_id)?;
        let resp = self.client.perform(req).await?;
        Ok(decode_url(resp.body()))
    }

    pub async fn list_templates(
        &self,
        editor_id: &str,
        creator_id: &str,
        opts: &RequestOptions,
    ) -> Result<Vec<TemplateDescriptor>, DavError> {
        let opts = self.client.options(opts);
        let req = requests::list_templates(self.client.context(), &opts, editor_id, creator_id)?;
        let resp = self.client.perform(req).await?;
        Ok(decode_templates(resp.body()))
    }

    /// Templates of the plain-text editor.
    pub async fn list_text_templates(
        &self,
        opts: &RequestOptions,
    ) -> Result<Vec<TemplateDescriptor>, DavError> {
        self.list_templates(DEFAULT_TEMPLATE_EDITOR, DEFAULT_TEMPLATE_CREATOR, opts)
            .await
    }

    /// Create `path` with a creator, optionally from a template, and return the editing URL.
    pub async fn create_file(
        &self,
        path: &str,
        editor_id: &str,
        creator_id: &str,
        template_id: Option<&str>,
        opts: &RequestOptions,
    ) -> Result<String, DavError> {
        let opts = self.client.options(opts);
        let req = requests::create_file(
            self.client.context(),
            &opts,
            path,
            editor_id,
            creator_id,
            template_id,
        )?;
        let resp = self.client.perform(req).await?;
        Ok(decode_url(resp.body()))
    }
}
