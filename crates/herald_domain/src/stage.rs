/// Named steps of a run, used to tag milestones and failures in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Configure,
    Credential,
    Generate,
    Render,
    Dispatch,
}
