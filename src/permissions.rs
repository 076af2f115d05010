//! Names for Discord permission and user-flag bitfields.

use serenity::all::{Permissions, UserPublicFlags};

/// Hidden from the "key permissions" summary.
const MINOR_PERMISSIONS: &[&str] = &["USE_EXTERNAL_EMOJIS", "USE_VAD", "CONNECT"];

/// Permission names set in `bits`, lowest bit first. Bits serenity does not
/// know are ignored.
pub fn permission_names(bits: u64) -> Vec<&'static str> {
    Permissions::from_bits_truncate(bits)
        .iter_names()
        .map(|(name, _)| name)
        .collect()
}

/// Up to `limit` permissions worth showing in a summary.
pub fn key_permissions(bits: u64, limit: usize) -> Vec<&'static str> {
    permission_names(bits)
        .into_iter()
        .filter(|name| !MINOR_PERMISSIONS.contains(name))
        .take(limit)
        .collect()
}

pub fn user_flag_names(bits: u64) -> Vec<&'static str> {
    UserPublicFlags::from_bits_truncate(bits as u32)
        .iter_names()
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_names() {
        assert!(permission_names(0).is_empty());
        assert_eq!(permission_names(1 << 3), vec!["ADMINISTRATOR"]);
        assert_eq!(
            permission_names((1 << 1) | (1 << 28)),
            vec!["KICK_MEMBERS", "MANAGE_ROLES"]
        );
    }

    #[test]
    fn test_voice_channel_status_is_named() {
        let names = permission_names(1 << 48);
        assert_eq!(names, vec!["SET_VOICE_CHANNEL_STATUS"]);
        assert_eq!(key_permissions(1 << 48, 10), names);
    }

    #[test]
    fn test_unknown_bits_ignored() {
        assert!(permission_names(1 << 63).is_empty());
        assert_eq!(permission_names((1 << 63) | (1 << 3)), vec!["ADMINISTRATOR"]);
    }

    #[test]
    fn test_key_permissions_filters_minor() {
        let bits = (1 << 18) | (1 << 20) | (1 << 25) | (1 << 11);
        assert_eq!(key_permissions(bits, 10), vec!["SEND_MESSAGES"]);
    }

    #[test]
    fn test_key_permissions_limit() {
        let bits = (1u64 << 20) - 1;
        let keys = key_permissions(bits, 10);
        assert_eq!(keys.len(), 10);
        assert_eq!(keys[0], "CREATE_INSTANT_INVITE");
        assert!(!keys.contains(&"USE_EXTERNAL_EMOJIS"));
    }

    #[test]
    fn test_user_flags() {
        assert_eq!(
            user_flag_names((1 << 22) | (1 << 9)),
            vec!["EARLY_SUPPORTER", "ACTIVE_DEVELOPER"]
        );
        assert!(user_flag_names(0).is_empty());
    }
}
