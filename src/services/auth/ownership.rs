/*
 * Responsibility
 * - 所有者による変更/削除の認可 (BOLA 対策)
 * - 判定順序は existence → ownership で固定する
 *   (存在しない id に対して「誰かが持っている」ことを 403 で漏らさない)
 * - I/O はしない。呼び出し側が取得済みの Option<R> を渡す
 */

/// Something with exactly one immutable owner.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub fn authorize(identity_id: i64, owner_id: i64) -> Decision {
    if identity_id == owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardError {
    NotFound,
    Denied,
}

/// Existence check, then ownership check. Returns the resource only when
/// both pass, so a caller cannot reach the mutation without it.
pub fn guard_owned<R: Owned>(identity_id: i64, resource: Option<R>) -> Result<R, GuardError> {
    let resource = resource.ok_or(GuardError::NotFound)?;

    match authorize(identity_id, resource.owner_id()) {
        Decision::Allow => Ok(resource),
        Decision::Deny => Err(GuardError::Denied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing {
        owner: i64,
    }

    impl Owned for Thing {
        fn owner_id(&self) -> i64 {
            self.owner
        }
    }

    #[test]
    fn authorize_compares_ids() {
        assert_eq!(authorize(1, 1), Decision::Allow);
        assert_eq!(authorize(1, 2), Decision::Deny);
        assert_eq!(authorize(2, 1), Decision::Deny);
    }

    #[test]
    fn owner_passes() {
        let thing = guard_owned(7, Some(Thing { owner: 7 })).unwrap();
        assert_eq!(thing.owner, 7);
    }

    #[test]
    fn non_owner_is_denied() {
        assert_eq!(
            guard_owned(7, Some(Thing { owner: 8 })).err(),
            Some(GuardError::Denied)
        );
    }

    #[test]
    fn missing_resource_is_not_found_for_anyone() {
        for identity in [0, 1, 7, i64::MAX] {
            assert_eq!(
                guard_owned::<Thing>(identity, None).err(),
                Some(GuardError::NotFound)
            );
        }
    }
}
