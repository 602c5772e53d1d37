//! Stack entry capture
//!
//! A [`StackEntry`] records where an error was wrapped or annotated, on which
//! host, and the context that was in effect at that moment. Capture cannot
//! fail: a host that cannot be resolved is recorded as an empty string.
//!
//! The [`Annotator`] bundles the two collaborators a capture needs, a
//! [`ContextStore`] and a [`HostResolver`]. Most callers never build one and
//! go through the default annotator bound to the process-wide store.

use crate::config::CaptureConfig;
use crate::state::{global_store, ContextData, ContextStore};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::panic::Location;
use std::sync::Arc;
use tracing::trace;

static DEFAULT_ANNOTATOR: Lazy<Annotator> = Lazy::new(Annotator::default);

/// Resolves the identity of the local machine
pub trait HostResolver: Send + Sync {
    /// Best-effort host name; `None` when it cannot be determined
    fn hostname(&self) -> Option<String>;
}

/// Looks up the hostname from the operating system on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostResolver;

impl HostResolver for SystemHostResolver {
    fn hostname(&self) -> Option<String> {
        hostname::get().ok().and_then(|h| h.into_string().ok())
    }
}

/// Always reports the same host name
#[derive(Debug, Clone)]
pub struct StaticHostResolver(String);

impl StaticHostResolver {
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }
}

impl HostResolver for StaticHostResolver {
    fn hostname(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reports no host at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHostResolver;

impl HostResolver for NoHostResolver {
    fn hostname(&self) -> Option<String> {
        None
    }
}

/// Source location of a wrap or annotate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location of whoever called the enclosing `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// One diagnostic snapshot in an annotated error's history
///
/// Entries are never modified after capture. Later changes to the context
/// store do not reach back into entries that already exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEntry {
    pub host: String,
    pub file: String,
    pub line: u32,
    pub data: ContextData,
}

impl StackEntry {
    /// `host:file:line`
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.host, self.file, self.line)
    }
}

/// Capture context: where ambient data comes from and how the host is named
#[derive(Clone)]
pub struct Annotator {
    store: Arc<ContextStore>,
    resolver: Arc<dyn HostResolver>,
}

impl Annotator {
    pub fn new(store: Arc<ContextStore>, resolver: Arc<dyn HostResolver>) -> Self {
        Self { store, resolver }
    }

    /// Builds an annotator over `store` using the capture settings
    ///
    /// `host_override` wins over lookup; with `resolve_host = false` and no
    /// override, entries carry an empty host.
    pub fn from_config(config: &CaptureConfig, store: Arc<ContextStore>) -> Self {
        let resolver: Arc<dyn HostResolver> = match (&config.host_override, config.resolve_host) {
            (Some(host), _) => Arc::new(StaticHostResolver::new(host.clone())),
            (None, true) => Arc::new(SystemHostResolver),
            (None, false) => Arc::new(NoHostResolver),
        };
        Self::new(store, resolver)
    }

    /// The annotator used by [`AnnotatedError::new`](crate::AnnotatedError::new)
    /// and friends: process-wide store, system hostname
    pub fn global() -> &'static Annotator {
        &DEFAULT_ANNOTATOR
    }

    pub fn store(&self) -> &Arc<ContextStore> {
        &self.store
    }

    /// Captures an entry attributed to the caller of this function
    #[track_caller]
    pub fn capture(&self, data: ContextData) -> StackEntry {
        self.capture_at(CallSite::caller(), data)
    }

    /// Captures an entry at an explicit call site
    ///
    /// The store snapshot is taken first and `data` is merged over it, so a
    /// caller-supplied key replaces a same-named ambient key in this entry
    /// only. The store itself is left untouched.
    pub fn capture_at(&self, site: CallSite, data: ContextData) -> StackEntry {
        let host = self.resolver.hostname().unwrap_or_default();
        let mut merged = self.store.snapshot();
        merged.extend(data);

        trace!(host = %host, file = %site.file, line = site.line, keys = merged.len(), "captured stack entry");

        StackEntry {
            host,
            file: site.file,
            line: site.line,
            data: merged,
        }
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(global_store(), Arc::new(SystemHostResolver))
    }
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> ContextData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn scoped(host: &str) -> Annotator {
        Annotator::new(
            Arc::new(ContextStore::new()),
            Arc::new(StaticHostResolver::new(host)),
        )
    }

    #[test]
    fn test_capture_records_caller_location() {
        let annotator = scoped("node-1");
        let expected_line = line!() + 1;
        let entry = annotator.capture(ContextData::new());

        assert_eq!(entry.file, file!());
        assert_eq!(entry.line, expected_line);
        assert_eq!(entry.host, "node-1");
        assert_eq!(entry.location(), format!("node-1:{}:{}", file!(), expected_line));
    }

    #[test]
    fn test_caller_data_overrides_store_without_mutating_it() {
        let annotator = scoped("node-1");
        annotator.store().set("bucket", "ambient");
        annotator.store().set("region", "eu");

        let entry = annotator.capture(data(&[("bucket", "explicit")]));

        assert_eq!(entry.data, data(&[("bucket", "explicit"), ("region", "eu")]));
        assert_eq!(annotator.store().get("bucket"), Some("ambient".to_string()));
    }

    #[test]
    fn test_entries_are_isolated_from_later_store_changes() {
        let annotator = scoped("node-1");
        annotator.store().set("phase", "upload");

        let first = annotator.capture(ContextData::new());
        annotator.store().clear();
        annotator.store().set("phase", "commit");
        let second = annotator.capture(ContextData::new());

        assert_eq!(first.data.get("phase"), Some(&"upload".to_string()));
        assert_eq!(second.data.get("phase"), Some(&"commit".to_string()));
    }

    #[test]
    fn test_unresolved_host_is_empty() {
        let annotator = Annotator::new(Arc::new(ContextStore::new()), Arc::new(NoHostResolver));
        let entry = annotator.capture_at(CallSite::new("lib.rs", 10), ContextData::new());

        assert_eq!(entry.host, "");
        assert_eq!(entry.location(), ":lib.rs:10");
    }

    #[test]
    fn test_from_config_host_selection() {
        let store = Arc::new(ContextStore::new());

        let overridden = CaptureConfig {
            resolve_host: true,
            host_override: Some("pinned".to_string()),
        };
        let entry = Annotator::from_config(&overridden, Arc::clone(&store))
            .capture(ContextData::new());
        assert_eq!(entry.host, "pinned");

        let disabled = CaptureConfig {
            resolve_host: false,
            host_override: None,
        };
        let entry = Annotator::from_config(&disabled, store).capture(ContextData::new());
        assert_eq!(entry.host, "");
    }

    #[test]
    fn test_stack_entry_json_field_names() {
        let entry = StackEntry {
            host: "h".to_string(),
            file: "f.rs".to_string(),
            line: 3,
            data: data(&[("k", "v")]),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"Host": "h", "File": "f.rs", "Line": 3, "Data": {"k": "v"}})
        );
    }
}
