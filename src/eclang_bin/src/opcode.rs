//! Instruction bytes of the compiled form.

/// Create a node and append it at the current scope.
pub const CREATE: u8 = 0x01;
/// Assign an attribute on the most recently created/entered node.
pub const ATTRIBUTE: u8 = 0x02;
/// Descend into the most recently created node.
pub const SCOPE_ENTER: u8 = 0x03;
/// Return to the parent scope.
pub const SCOPE_EXIT: u8 = 0x04;
/// Dynamic include marker; operand is the path or alias.
pub const INCLUDE: u8 = 0x05;
/// Dynamic template marker; operand is the path or alias.
pub const TEMPLATE: u8 = 0x06;
/// Mark the current scope's node as this file's template node.
pub const MARK_TEMPLATE: u8 = 0x07;

/// In a class reference: the class is not registered, its name follows
/// as a string. In an attribute reference: a custom attribute, name and
/// string value follow.
pub const CUSTOM_MARKER: u8 = 0xFF;

/// String kind bytes.
pub const STRING_NORMAL: u8 = 0x00;
pub const STRING_MARKDOWN: u8 = 0x01;
