/// Authorization engine
///
/// One pure decision function over a closed action set, instead of
/// per-entity permission types. Every lifecycle operation loads the actor's
/// [`BoardAccess`] inside its transaction, then asks `authorize` whether the
/// action may proceed.
///
/// # Rule table
///
/// | Action                  | Rule                                    |
/// |-------------------------|-----------------------------------------|
/// | Board read/update       | actor is owner or member                |
/// | Board delete            | actor is owner                          |
/// | Task create/update/delete | actor is owner or member of the board |
/// | Comment create/read     | actor is owner or member of the board   |
/// | Comment delete          | actor is the comment's author           |
///
/// # Information hiding
///
/// An actor with no access at all is denied with [`DenyReason::Hidden`],
/// which the caller surfaces as `NotFound`, so the entity's existence is
/// not revealed. [`DenyReason::Forbidden`] is reserved for actors who can see
/// the entity but lack the specific right (a member deleting a board, a
/// non-author deleting a comment).
///
/// # Example
///
/// ```
/// use kanflow_core::authz::{authorize, Action, BoardAccess, Decision, DenyReason};
/// use uuid::Uuid;
///
/// let actor = Uuid::new_v4();
/// let member = BoardAccess { is_owner: false, is_member: true };
///
/// assert_eq!(authorize(actor, &Action::BoardRead, member), Decision::Allow);
/// assert_eq!(
///     authorize(actor, &Action::BoardDelete, member),
///     Decision::Deny(DenyReason::Forbidden)
/// );
/// ```

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// The actor's relationship to a board
///
/// Ownership and membership are separate facts: the owner is *not* stored in
/// the member set, but is always fully authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardAccess {
    /// Actor created the board
    pub is_owner: bool,

    /// Actor is listed in the board's member set
    pub is_member: bool,
}

impl BoardAccess {
    /// Owner or member
    pub fn has_access(&self) -> bool {
        self.is_owner || self.is_member
    }
}

/// Closed set of authorizable actions
///
/// Task and comment actions are decided against the access facts of the
/// *parent board*; `CommentDelete` additionally carries the comment's author
/// because that rule is author-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BoardRead,
    BoardUpdate,
    BoardDelete,
    TaskCreate,
    TaskUpdate,
    TaskDelete,
    CommentCreate,
    CommentRead,
    CommentDelete { author: Uuid },
}

/// Reason an action was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Actor cannot see the entity at all; surface as `NotFound`
    Hidden,

    /// Actor can see the entity but lacks the right; surface as `Forbidden`
    Forbidden,
}

/// Authorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Decides whether `actor` may perform `action` on an entity whose board
/// relationship is described by `access`
///
/// Pure function of its arguments: identical inputs always yield identical
/// decisions.
pub fn authorize(actor: Uuid, action: &Action, access: BoardAccess) -> Decision {
    // Zero visibility dominates every rule.
    if !access.has_access() {
        return Decision::Deny(DenyReason::Hidden);
    }

    match action {
        Action::BoardRead
        | Action::BoardUpdate
        | Action::TaskCreate
        | Action::TaskUpdate
        | Action::TaskDelete
        | Action::CommentCreate
        | Action::CommentRead => Decision::Allow,

        Action::BoardDelete => {
            if access.is_owner {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::Forbidden)
            }
        }

        Action::CommentDelete { author } => {
            if actor == *author {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::Forbidden)
            }
        }
    }
}

/// Converts a decision into a `CoreResult`, naming the entity for the
/// `NotFound` case
///
/// `entity` is what a hidden denial claims not to exist ("board", "task",
/// "comment").
pub fn require(
    actor: Uuid,
    action: &Action,
    access: BoardAccess,
    entity: &'static str,
) -> CoreResult<()> {
    match authorize(actor, action, access) {
        Decision::Allow => Ok(()),
        Decision::Deny(DenyReason::Hidden) => Err(CoreError::NotFound(entity)),
        Decision::Deny(DenyReason::Forbidden) => Err(CoreError::Forbidden(format!(
            "not permitted to perform this action on the {}",
            entity
        ))),
    }
}
