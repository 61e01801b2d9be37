//! Forced failures for exercising error paths.
//!
//! A [`FaultPolicy`] is handed to each service at construction. The
//! default policy never fails.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultTag {
    LoadPosts,
    DeletePost,
    SearchUsers,
}

impl FaultTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultTag::LoadPosts => "load_posts",
            FaultTag::DeletePost => "delete_post",
            FaultTag::SearchUsers => "search_users",
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            FaultTag::LoadPosts => "load posts",
            FaultTag::DeletePost => "delete post",
            FaultTag::SearchUsers => "search users",
        }
    }
}

impl fmt::Display for FaultTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown fault tag: {0}")]
pub struct UnknownFaultTag(String);

impl FromStr for FaultTag {
    type Err = UnknownFaultTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "load_posts" => Ok(FaultTag::LoadPosts),
            "delete_post" => Ok(FaultTag::DeletePost),
            "search_users" => Ok(FaultTag::SearchUsers),
            other => Err(UnknownFaultTag(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultPolicy {
    forced: Option<FaultTag>,
}

impl FaultPolicy {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn failing(tag: FaultTag) -> Self {
        Self { forced: Some(tag) }
    }

    pub fn from_tag(tag: Option<FaultTag>) -> Self {
        Self { forced: tag }
    }

    pub fn forced(&self) -> Option<FaultTag> {
        self.forced
    }

    /// Must run before any store access.
    pub fn check(&self, tag: FaultTag) -> Result<(), DomainError> {
        if self.forced == Some(tag) {
            return Err(DomainError::Simulated(tag.operation()));
        }
        Ok(())
    }
}
