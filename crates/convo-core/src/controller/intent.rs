/// User actions the controller understands. Views translate their own events
/// into these and never touch `ChatState` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    LoadList,
    Select(String),
    NewChat,
    Send(String),
    Delete(String),
    DismissError,
    Logout,
}
