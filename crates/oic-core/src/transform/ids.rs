/// Parent of the root group and the environment.
pub const WORKSPACE_ID: &str = "__WORKSPACE_ID__";

pub const ROOT_GROUP_ID: &str = "__FLD_1__";

pub const ENVIRONMENT_ID: &str = "__ENV_1__";

/// Hands out resource identifiers for a single build.
///
/// Requests count from `__REQ_0__`; tag groups continue after the root
/// group, starting at `__FLD_2__`.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    requests: usize,
    groups: usize,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_request(&mut self) -> String {
        let id = format!("__REQ_{}__", self.requests);
        self.requests += 1;
        id
    }

    pub fn next_group(&mut self) -> String {
        // Slot 1 is the root group.
        let id = format!("__FLD_{}__", self.groups + 2);
        self.groups += 1;
        id
    }
}
