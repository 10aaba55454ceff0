//! The request view the router matches against.

/// Read-only access to the parts of a request that routes can constrain.
pub trait RequestDescriptor {
    fn request_path(&self) -> &str;

    fn request_method(&self) -> &str;

    fn hostname(&self) -> Option<&str> {
        None
    }

    fn scheme(&self) -> Option<&str> {
        None
    }
}

impl<T: RequestDescriptor + ?Sized> RequestDescriptor for &T {
    fn request_path(&self) -> &str {
        (**self).request_path()
    }

    fn request_method(&self) -> &str {
        (**self).request_method()
    }

    fn hostname(&self) -> Option<&str> {
        (**self).hostname()
    }

    fn scheme(&self) -> Option<&str> {
        (**self).scheme()
    }
}

/// An owned request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub hostname: Option<String>,
    pub scheme: Option<String>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            hostname: None,
            scheme: None,
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }
}

impl RequestDescriptor for RequestInfo {
    fn request_path(&self) -> &str {
        &self.path
    }

    fn request_method(&self) -> &str {
        &self.method
    }

    fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }
}
