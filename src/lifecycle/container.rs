use crate::actor::ResourceActor;
use crate::client::ResourceClient;
use crate::config::ContainerConfig;
use crate::error::ResourceError;
use crate::resource::BundleResource;
use std::collections::HashMap;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

struct Registration {
    client: ResourceClient,
    task: JoinHandle<()>,
}

/// The owning container for a set of resources.
///
/// `ResourceContainer` is responsible for:
/// - **Activation**: spawning one [`ResourceActor`] per registered resource
/// - **Routing**: handing out the [`ResourceClient`] for a URI
/// - **Teardown**: deactivating resources and awaiting their tasks
///
/// Resources are keyed by URI, so every registered resource needs one.
/// Registering requires a running Tokio runtime.
///
/// # Example
///
/// ```rust,ignore
/// let mut container = ResourceContainer::new(ContainerConfig::default());
///
/// let client = container.register(switch)?;
/// client.set_attributes(attributes).await?;
///
/// container.shutdown().await?;
/// ```
pub struct ResourceContainer {
    config: ContainerConfig,
    registrations: HashMap<String, Registration>,
}

impl ResourceContainer {
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            config,
            registrations: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Activates `resource` and returns the client the native runtime uses to reach it.
    ///
    /// Fails with [`ResourceError::MissingUri`] when the resource has no URI and
    /// with [`ResourceError::AlreadyRegistered`] when the URI is taken. In both
    /// cases the resource is dropped without being activated.
    pub fn register<R: BundleResource>(&mut self, resource: R) -> Result<ResourceClient, ResourceError> {
        let uri = resource.base().uri().ok_or(ResourceError::MissingUri)?;
        if self.registrations.contains_key(&uri) {
            warn!(%uri, "Already registered");
            return Err(ResourceError::AlreadyRegistered(uri));
        }

        let (actor, client) = ResourceActor::new(resource, self.config.request_buffer);
        let task = tokio::spawn(actor.run());
        self.registrations.insert(
            uri.clone(),
            Registration {
                client: client.clone(),
                task,
            },
        );
        info!(%uri, size = self.registrations.len(), "Registered");
        Ok(client)
    }

    pub fn client(&self, uri: &str) -> Option<ResourceClient> {
        self.registrations.get(uri).map(|r| r.client.clone())
    }

    /// Registered URIs, sorted.
    pub fn uris(&self) -> Vec<String> {
        let mut uris: Vec<String> = self.registrations.keys().cloned().collect();
        uris.sort();
        uris
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Deactivates the resource at `uri` and waits for its task to finish.
    pub async fn unregister(&mut self, uri: &str) -> Result<(), ResourceError> {
        let registration = self
            .registrations
            .remove(uri)
            .ok_or_else(|| ResourceError::NotFound(uri.to_string()))?;
        let result = teardown(uri, registration).await;
        info!(%uri, size = self.registrations.len(), "Unregistered");
        result
    }

    /// Deactivates every resource and waits for all tasks.
    ///
    /// Every resource is torn down even if an earlier one fails; the first
    /// error is returned.
    pub async fn shutdown(self) -> Result<(), ResourceError> {
        info!(size = self.registrations.len(), "Shutting down container...");

        let mut first_error = None;
        for (uri, registration) in self.registrations {
            if let Err(e) = teardown(&uri, registration).await {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Container shutdown complete.");
                Ok(())
            }
        }
    }
}

async fn teardown(uri: &str, registration: Registration) -> Result<(), ResourceError> {
    let Registration { client, task } = registration;

    // Someone else may have deactivated the resource already; that still counts as torn down.
    let deactivated = match client.deactivate().await {
        Err(e) if e.is_terminated() => Ok(()),
        other => other,
    };
    drop(client);

    if let Err(e) = task.await {
        error!(%uri, "Resource task failed: {:?}", e);
        return Err(ResourceError::TaskFailed(format!("{}: {:?}", uri, e)));
    }
    deactivated
}
