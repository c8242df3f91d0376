use std::fmt;

use thiserror::Error;

use crate::MetadataRecord;

/// Largest id accepted for an override; `u32::MAX` is the kernel's
/// "leave unchanged" value for `chown(2)`.
pub const MAX_OWNER_ID: u32 = u32::MAX - 1;

/// Which half of an ownership override a value refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdKind {
    /// Owning user.
    Uid,
    /// Owning group.
    Gid,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uid => f.write_str("uid"),
            Self::Gid => f.write_str("gid"),
        }
    }
}

/// Error produced when a configured uid or gid override cannot be used.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error(
    "invalid owner {kind} override {value}: expected -1 (unset) or 0..={max}",
    max = MAX_OWNER_ID
)]
pub struct InvalidOwnerOverride {
    kind: IdKind,
    value: i64,
}

impl InvalidOwnerOverride {
    /// Returns which id was rejected.
    #[must_use]
    pub const fn kind(&self) -> IdKind {
        self.kind
    }

    /// Returns the rejected raw value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

/// Commit-wide uid/gid replacement applied to every visited entry.
///
/// Each half is independent: a uid-only override leaves group ownership as
/// the walker reported it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OwnerOverride {
    uid: Option<u32>,
    gid: Option<u32>,
}

impl OwnerOverride {
    /// Override that leaves ownership untouched.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            uid: None,
            gid: None,
        }
    }

    /// Creates an override from already-validated ids.
    #[must_use]
    pub const fn new(uid: Option<u32>, gid: Option<u32>) -> Self {
        Self { uid, gid }
    }

    /// Validates raw configuration values where any negative number means
    /// "unset".
    ///
    /// # Examples
    ///
    /// ```
    /// use metadata::OwnerOverride;
    ///
    /// let owner = OwnerOverride::from_raw(1000, -1).unwrap();
    /// assert_eq!(owner.uid(), Some(1000));
    /// assert_eq!(owner.gid(), None);
    ///
    /// assert!(OwnerOverride::from_raw(i64::from(u32::MAX), -1).is_err());
    /// ```
    pub fn from_raw(uid: i64, gid: i64) -> Result<Self, InvalidOwnerOverride> {
        Ok(Self {
            uid: validate(IdKind::Uid, uid)?,
            gid: validate(IdKind::Gid, gid)?,
        })
    }

    /// Returns the uid override, if any.
    #[must_use]
    pub const fn uid(&self) -> Option<u32> {
        self.uid
    }

    /// Returns the gid override, if any.
    #[must_use]
    pub const fn gid(&self) -> Option<u32> {
        self.gid
    }

    /// Returns `true` when neither id is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.uid.is_none() && self.gid.is_none()
    }

    /// Writes the configured ids into `record`.
    ///
    /// Returns `true` when at least one id was written. Ids are written even
    /// if the record already carries the same value.
    pub fn apply<M>(&self, record: &mut M) -> bool
    where
        M: MetadataRecord + ?Sized,
    {
        if let Some(uid) = self.uid {
            record.set_uid(uid);
        }
        if let Some(gid) = self.gid {
            record.set_gid(gid);
        }
        !self.is_empty()
    }
}

fn validate(kind: IdKind, raw: i64) -> Result<Option<u32>, InvalidOwnerOverride> {
    if raw < 0 {
        return Ok(None);
    }
    match u32::try_from(raw) {
        Ok(id) if id <= MAX_OWNER_ID => Ok(Some(id)),
        _ => Err(InvalidOwnerOverride { kind, value: raw }),
    }
}
