use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AddressError, AddressResult};
use crate::models::{Address, CreateAddress, UpdateAddress, new_model};
use crate::repository::AddressRepository;

pub struct AddressService<R: AddressRepository> {
    repository: Arc<R>,
}

impl<R: AddressRepository> AddressService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Save an address; the user's first one becomes the default
    pub async fn create_address(&self, user_id: Uuid, input: CreateAddress) -> AddressResult<Address> {
        input
            .validate()
            .map_err(|e| AddressError::Validation(e.to_string()))?;

        let is_default = input.is_default.unwrap_or(false);
        let address = self
            .repository
            .create(new_model(user_id, input, is_default))
            .await?;
        Ok(address.into())
    }

    pub async fn list_addresses(&self, user_id: Uuid) -> AddressResult<Vec<Address>> {
        let addresses = self.repository.list(user_id).await?;
        Ok(addresses.into_iter().map(Address::from).collect())
    }

    pub async fn get_address(&self, user_id: Uuid, id: Uuid) -> AddressResult<Address> {
        self.repository
            .find(id, user_id)
            .await?
            .map(Address::from)
            .ok_or(AddressError::NotFound(id))
    }

    pub async fn update_address(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateAddress,
    ) -> AddressResult<Address> {
        input
            .validate()
            .map_err(|e| AddressError::Validation(e.to_string()))?;
        self.repository
            .update(id, user_id, input)
            .await?
            .map(Address::from)
            .ok_or(AddressError::NotFound(id))
    }

    pub async fn set_default(&self, user_id: Uuid, id: Uuid) -> AddressResult<Address> {
        self.repository
            .set_default(id, user_id)
            .await?
            .map(Address::from)
            .ok_or(AddressError::NotFound(id))
    }

    pub async fn delete_address(&self, user_id: Uuid, id: Uuid) -> AddressResult<()> {
        if !self.repository.delete(id, user_id).await? {
            return Err(AddressError::NotFound(id));
        }
        Ok(())
    }
}
