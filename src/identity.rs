//! Addressing and classification metadata for a resource.

use serde::{Deserialize, Serialize};

/// Name, URI, resource type and technology address of a resource.
///
/// The four fields are independent and stay `None` until somebody sets them,
/// normally the container or factory that creates the resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub name: Option<String>,
    pub uri: Option<String>,
    /// Domain classification, e.g. `oic.r.switch.binary`.
    pub resource_type: Option<String>,
    /// Technology specific address, e.g. a ZigBee short id.
    pub address: Option<String>,
}

impl ResourceIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_touch_only_their_field() {
        let identity = ResourceIdentity::new().with_uri("/zigbee/light/1");

        assert_eq!(identity.uri.as_deref(), Some("/zigbee/light/1"));
        assert_eq!(identity.name, None);
        assert_eq!(identity.resource_type, None);
        assert_eq!(identity.address, None);
    }
}
