use async_trait::async_trait;
use chrono::Utc;
use entity::addresses;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AddressResult;
use crate::models::UpdateAddress;

/// Repository trait for addresses
///
/// Every method is scoped to the owning user. Writes that leave an address
/// as default clear the user's other defaults in the same transaction, and a
/// user's first address is always saved as the default.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Default first, then newest
    async fn list(&self, user_id: Uuid) -> AddressResult<Vec<addresses::Model>>;

    async fn find(&self, id: Uuid, user_id: Uuid) -> AddressResult<Option<addresses::Model>>;

    async fn create(&self, address: addresses::Model) -> AddressResult<addresses::Model>;

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateAddress,
    ) -> AddressResult<Option<addresses::Model>>;

    async fn set_default(&self, id: Uuid, user_id: Uuid) -> AddressResult<Option<addresses::Model>>;

    /// Returns false when absent or not the user's
    async fn delete(&self, id: Uuid, user_id: Uuid) -> AddressResult<bool>;
}

/// Newest first, with the default pulled to the front
pub(crate) fn sort_for_listing(addresses: &mut [addresses::Model]) {
    addresses.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// In-memory implementation of AddressRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAddressRepository {
    addresses: Arc<RwLock<HashMap<Uuid, addresses::Model>>>,
}

impl InMemoryAddressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn clear_defaults(addresses: &mut HashMap<Uuid, addresses::Model>, user_id: Uuid, keep: Uuid) {
    for address in addresses.values_mut() {
        if address.user_id == user_id && address.id != keep {
            address.is_default = false;
        }
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressRepository {
    async fn list(&self, user_id: Uuid) -> AddressResult<Vec<addresses::Model>> {
        let addresses = self.addresses.read().await;
        let mut result: Vec<_> = addresses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        sort_for_listing(&mut result);
        Ok(result)
    }

    async fn find(&self, id: Uuid, user_id: Uuid) -> AddressResult<Option<addresses::Model>> {
        let addresses = self.addresses.read().await;
        Ok(addresses.get(&id).filter(|a| a.user_id == user_id).cloned())
    }

    async fn create(&self, mut address: addresses::Model) -> AddressResult<addresses::Model> {
        let mut addresses = self.addresses.write().await;
        if !addresses.values().any(|a| a.user_id == address.user_id) {
            address.is_default = true;
        }
        if address.is_default {
            clear_defaults(&mut addresses, address.user_id, address.id);
        }
        addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateAddress,
    ) -> AddressResult<Option<addresses::Model>> {
        let mut addresses = self.addresses.write().await;
        let Some(mut address) = addresses.get(&id).filter(|a| a.user_id == user_id).cloned() else {
            return Ok(None);
        };

        input.apply(&mut address);
        address.updated_at = Utc::now().into();
        if address.is_default {
            clear_defaults(&mut addresses, user_id, id);
        }
        addresses.insert(id, address.clone());
        Ok(Some(address))
    }

    async fn set_default(&self, id: Uuid, user_id: Uuid) -> AddressResult<Option<addresses::Model>> {
        self.update(
            id,
            user_id,
            UpdateAddress {
                is_default: Some(true),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AddressResult<bool> {
        let mut addresses = self.addresses.write().await;
        match addresses.get(&id) {
            Some(address) if address.user_id == user_id => {
                addresses.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
