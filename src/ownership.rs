//! Owner and group resolution
//!
//! Names come from the system user database through `uzers`, so NSS
//! sources and macOS directory services are honored. Ids without an
//! entry are shown as `uid:N` / `gid:N`.

use std::fs;

use serde::Serialize;

/// Who owns an entry and what that means for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
    pub owner: String,
    pub group: String,
    /// Owned by root while the current user is someone else
    pub requires_sudo: bool,
}

/// Resolve ownership for an entry's metadata. `None` off unix.
#[cfg(unix)]
pub fn lookup_ownership(meta: &fs::Metadata) -> Option<Ownership> {
    use std::os::unix::fs::MetadataExt;

    let uid = meta.uid();
    let gid = meta.gid();

    Some(Ownership {
        uid,
        gid,
        owner: user_name(uid),
        group: group_name(gid),
        requires_sudo: requires_sudo(uid, uzers::get_effective_uid()),
    })
}

#[cfg(not(unix))]
pub fn lookup_ownership(_meta: &fs::Metadata) -> Option<Ownership> {
    None
}

#[cfg(unix)]
pub fn user_name(uid: u32) -> String {
    uzers::get_user_by_uid(uid)
        .map(|user| user.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("uid:{}", uid))
}

#[cfg(unix)]
pub fn group_name(gid: u32) -> String {
    uzers::get_group_by_gid(gid)
        .map(|group| group.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("gid:{}", gid))
}

/// Root-owned entries need elevated rights unless we already are root.
pub fn requires_sudo(owner_uid: u32, current_uid: u32) -> bool {
    owner_uid == 0 && current_uid != 0
}
