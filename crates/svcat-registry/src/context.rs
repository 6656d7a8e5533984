use svcat_types::NameSpace;

/// Request-scoped values handed to every registry operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    namespace: Option<NameSpace>,
    request_id: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<NameSpace>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// namespace of the request, an empty namespace counts as none
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

#[cfg(test)]
mod test {

    use super::RequestContext;

    #[test]
    fn test_empty_namespace_is_none() {
        assert_eq!(RequestContext::new().namespace(), None);
        assert_eq!(RequestContext::new().with_namespace("").namespace(), None);
        assert_eq!(
            RequestContext::new().with_namespace("ns1").namespace(),
            Some("ns1")
        );
    }
}
