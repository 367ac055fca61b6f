use crate::error::ContextError;
use crate::markup::{Callback, Recipient};
use crate::options::CompilerOptions;
use serde::{Deserialize, Serialize};
use url::Url;

/// Per-call data handed in by the webhook layer. Lives for one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: String,
    pub called: String,
    pub call_sid: String,
    callback_base: Url,
}

impl CallContext {
    pub fn new(
        caller: impl Into<String>,
        called: impl Into<String>,
        call_sid: impl Into<String>,
        callback_base: &str,
    ) -> Result<Self, ContextError> {
        let invalid = |message: String| ContextError::InvalidCallbackBase {
            url: callback_base.to_string(),
            message,
        };
        let base = Url::parse(callback_base).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }

        Ok(Self {
            caller: caller.into(),
            called: called.into(),
            call_sid: call_sid.into(),
            callback_base: base,
        })
    }

    pub fn callback_base(&self) -> &Url {
        &self.callback_base
    }

    /// Resolves a symbolic callback into the absolute URL the telephony
    /// platform will call back.
    pub fn callback_url(&self, callback: &Callback, options: &CompilerOptions) -> String {
        match callback {
            Callback::Gather { block_id } => {
                self.endpoint(&options.gather_path, &[("blockId", block_id.as_str())])
            }
            Callback::DialStatus => self.endpoint(&options.status_path, &[]),
            Callback::RecordingStatus => self.endpoint(&options.recording_path, &[]),
            Callback::Menu => self.endpoint(&options.menu_path, &[]),
            // Absolute URLs are used verbatim, anything else is relative to the base.
            Callback::Custom(target) => match Url::parse(target) {
                Ok(url) => url.to_string(),
                Err(_) => self.relative(target),
            },
        }
    }

    pub fn recipient(&self, recipient: &Recipient) -> String {
        match recipient {
            Recipient::Caller => self.caller.clone(),
            Recipient::Number(number) => number.clone(),
        }
    }

    /// Resolves `target` below the base path, keeping its query and fragment.
    fn relative(&self, target: &str) -> String {
        let mut base = self.callback_base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        match base.join(target.trim_start_matches('/')) {
            Ok(url) => url.to_string(),
            Err(_) => self.endpoint(target, &[]),
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = self.callback_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url.to_string()
    }
}
