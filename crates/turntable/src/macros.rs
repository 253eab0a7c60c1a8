/// Constructor and `&str` view for `String` newtypes used as page references.
#[macro_export]
macro_rules! impl_name_newtype {
    ($name:ty) => {
        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
