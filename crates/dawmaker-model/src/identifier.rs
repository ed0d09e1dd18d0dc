/// Reserved words of C++17 plus the alternative operator tokens.
/// Every target framework generates C++, so one list covers them all.
pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "class", "compl", "const", "const_cast",
    "constexpr", "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "wchar_t", "while", "xor", "xor_eq",
];

pub fn is_cpp_keyword(word: &str) -> bool {
    CPP_KEYWORDS.contains(&word)
}

/// True when `name` can be used verbatim as a C++ identifier
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_cpp_keyword(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("Cutoff"));
        assert!(is_valid_identifier("_gain2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1 Bad Name!"));
        assert!(!is_valid_identifier("Filter Cutoff"));
        assert!(!is_valid_identifier("délai"));
        assert!(!is_valid_identifier("class"));
    }
}
