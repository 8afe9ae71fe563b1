//! Names a module may not take in the generated sketch
//!
//! Module IDs become C++ variables at file scope and are referenced from
//! inside `setup()`, `loop()` and `dispatch_command()`, so they must not be
//! keywords and must not collide with the globals, locals and parameters the
//! generator and the built-in plugins emit.

/// C++ keywords and alternative operator tokens
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Arduino core names plus everything the generator and the built-in
/// plugins declare
const SKETCH_NAMES: &[&str] = &[
    // Arduino core
    "setup", "loop", "main", "Serial", "String", "millis", "micros", "delay", "strcmp",
    "byte", "boolean", "word", "HIGH", "LOW", "INPUT", "OUTPUT", "INPUT_PULLUP",
    "LED_BUILTIN", "NULL",
    // generator
    "STATUS_UPDATE_INTERVAL_MS", "last_status_update", "now", "dispatch_command", "module",
    "command", "arg",
    // pubsub
    "nh", "ros", "std_msgs",
];

/// Whether `name` is a C++ keyword
pub fn is_cpp_keyword(name: &str) -> bool {
    CPP_KEYWORDS.contains(&name)
}

/// Whether `name` is unusable as a module ID in the generated sketch
pub fn is_reserved_identifier(name: &str) -> bool {
    is_cpp_keyword(name) || SKETCH_NAMES.contains(&name)
}
