/// Who is making a request.
///
/// Built once per request by the auth extractors and passed explicitly into
/// every donation operation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Identity {
    user_id: Option<i32>,
    is_admin: bool,
}

impl Identity {
    pub fn new(user_id: Option<i32>, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: i32) -> Self {
        Self::new(Some(user_id), false)
    }

    pub fn admin(user_id: i32) -> Self {
        Self::new(Some(user_id), true)
    }

    /// The caller's numeric identity, or `None` when unauthenticated.
    pub fn user_id(&self) -> Option<i32> {
        self.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}
