// src/macros.rs
#[macro_export]
macro_rules! s {
    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Literal, const or &str variable → owned String
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // Concatenate any number of &str-likes into one String
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

/// Build a `Vec<String>` header/row from string-like items.
#[macro_export]
macro_rules! row {
    ($($cell:expr),* $(,)?) => {
        vec![$( ::std::string::String::from($cell) ),*]
    };
}
