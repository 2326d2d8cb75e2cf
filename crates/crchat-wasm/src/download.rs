use crchat_session::{FileSink, StoreError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Hands exported transcripts to the browser as a file download
#[derive(Debug, Default, Clone, Copy)]
pub struct BlobDownload;

impl BlobDownload {
    fn download(filename: &str, contents: &str) -> Result<(), JsValue> {
        let document = crate::document()?;
        let parts = js_sys::Array::of1(&JsValue::from_str(contents));
        let options = BlobPropertyBag::new();
        options.set_type("text/plain");
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let link = document.create_element("a")?.dyn_into::<HtmlAnchorElement>()?;
        link.set_href(&url);
        link.set_download(filename);
        let body = document.body().ok_or_else(|| JsValue::from_str("No body"))?;
        body.append_child(&link)?;
        link.click();
        body.remove_child(&link)?;
        Url::revoke_object_url(&url)?;
        Ok(())
    }
}

impl FileSink for BlobDownload {
    fn save(&self, filename: &str, contents: &str) -> Result<String, StoreError> {
        Self::download(filename, contents).map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
        Ok(filename.to_string())
    }
}
