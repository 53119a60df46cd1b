//! Key layout of the directory namespace.
//!
//! Viewers, uploaders and their companion lists all share one flat key space.
//! Companion collections are told apart from the entity records by a trailing
//! suffix, so every key read back from a scan goes through [`classify`] instead
//! of ad-hoc substring checks.

use thiserror::Error;

pub const VIEWER_PREFIX: &str = "viewer";
pub const UPLOADER_PREFIX: &str = "uploader";
pub const SERVERS_SUFFIX: &str = "servers";
pub const TAGS_SUFFIX: &str = "tags";

/// Hash of server address -> bitrate reported by the edge servers.
pub const BITRATE_TABLE_KEY: &str = "distrib";
/// Scalar `"yes"`/`"no"` flag raised whenever the viewer set changes.
pub const VIEWER_CHANGE_FLAG_KEY: &str = "modifViewer";

pub const VIEWER_PATTERN: &str = "viewer:*";
pub const VIEWER_SERVERS_PATTERN: &str = "viewer:*:servers";
pub const UPLOADER_PATTERN: &str = "uploader:*";
pub const UPLOADER_SERVERS_PATTERN: &str = "uploader:*:servers";

#[derive(Error, Debug, PartialEq, Clone)]
pub enum KeyError {
    #[error("entity id must not be empty")]
    EmptyId,
    #[error("unrecognized key shape: {0}")]
    Unrecognized(String),
}

/// The two kinds of session participants.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EntityKind {
    Viewer,
    Uploader,
}

impl EntityKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Viewer => VIEWER_PREFIX,
            EntityKind::Uploader => UPLOADER_PREFIX,
        }
    }

    pub fn record_key(&self, id: &str) -> Result<String, KeyError> {
        build(self.prefix(), id, None)
    }

    pub fn servers_key(&self, id: &str) -> Result<String, KeyError> {
        build(self.prefix(), id, Some(SERVERS_SUFFIX))
    }

    pub fn servers_pattern(&self) -> &'static str {
        match self {
            EntityKind::Viewer => VIEWER_SERVERS_PATTERN,
            EntityKind::Uploader => UPLOADER_SERVERS_PATTERN,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// What an enumerated key denotes, with the entity id it belongs to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum KeyClass {
    ViewerRecord(String),
    ViewerServers(String),
    UploaderRecord(String),
    UploaderTags(String),
    UploaderServers(String),
}

impl KeyClass {
    pub fn id(&self) -> &str {
        match self {
            KeyClass::ViewerRecord(id)
            | KeyClass::ViewerServers(id)
            | KeyClass::UploaderRecord(id)
            | KeyClass::UploaderTags(id)
            | KeyClass::UploaderServers(id) => id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            KeyClass::ViewerRecord(_) | KeyClass::ViewerServers(_) => EntityKind::Viewer,
            KeyClass::UploaderRecord(_)
            | KeyClass::UploaderTags(_)
            | KeyClass::UploaderServers(_) => EntityKind::Uploader,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, KeyClass::ViewerRecord(_) | KeyClass::UploaderRecord(_))
    }
}

pub fn viewer_key(id: &str) -> Result<String, KeyError> {
    EntityKind::Viewer.record_key(id)
}

pub fn viewer_servers_key(id: &str) -> Result<String, KeyError> {
    EntityKind::Viewer.servers_key(id)
}

pub fn uploader_key(id: &str) -> Result<String, KeyError> {
    EntityKind::Uploader.record_key(id)
}

pub fn uploader_tags_key(id: &str) -> Result<String, KeyError> {
    build(UPLOADER_PREFIX, id, Some(TAGS_SUFFIX))
}

pub fn uploader_servers_key(id: &str) -> Result<String, KeyError> {
    EntityKind::Uploader.servers_key(id)
}

fn build(prefix: &str, id: &str, suffix: Option<&str>) -> Result<String, KeyError> {
    if id.is_empty() {
        return Err(KeyError::EmptyId);
    }

    match suffix {
        Some(suffix) => Ok(format!("{}:{}:{}", prefix, id, suffix)),
        None => Ok(format!("{}:{}", prefix, id)),
    }
}

/// Classifies a key from the entity namespace.
///
/// The first segment selects the entity kind and a trailing `servers`/`tags`
/// segment selects the companion collection; whatever sits in between is the
/// id. Keys with any other shape (unknown prefix, empty id, a `tags` list on a
/// viewer) are rejected.
pub fn classify(key: &str) -> Result<KeyClass, KeyError> {
    let unrecognized = || KeyError::Unrecognized(key.to_string());

    let Some((prefix, rest)) = key.split_once(':') else {
        return Err(unrecognized());
    };

    let (id, suffix) = match rest.rsplit_once(':') {
        Some((id, suffix)) if suffix == SERVERS_SUFFIX || suffix == TAGS_SUFFIX => {
            (id, Some(suffix))
        }
        _ => (rest, None),
    };

    if id.is_empty() {
        return Err(unrecognized());
    }

    let id = id.to_string();

    match (prefix, suffix) {
        (VIEWER_PREFIX, None) => Ok(KeyClass::ViewerRecord(id)),
        (VIEWER_PREFIX, Some(SERVERS_SUFFIX)) => Ok(KeyClass::ViewerServers(id)),
        (UPLOADER_PREFIX, None) => Ok(KeyClass::UploaderRecord(id)),
        (UPLOADER_PREFIX, Some(TAGS_SUFFIX)) => Ok(KeyClass::UploaderTags(id)),
        (UPLOADER_PREFIX, Some(SERVERS_SUFFIX)) => Ok(KeyClass::UploaderServers(id)),
        _ => Err(unrecognized()),
    }
}
