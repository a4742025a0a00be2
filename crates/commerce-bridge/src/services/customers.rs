use async_trait::async_trait;
use commerce_core::{CustomerService, Result};
use commerce_types::customer::{Address, Customer, RegisterCustomer, UpdateCustomer};
use commerce_types::AddressId;

use crate::api::{segment, BridgeApi};
use crate::mappers::Mapper;
use crate::wire::{WireAddress, WireCustomer};

const ADDRESSES: &str = "/customers/me/addresses";

pub(crate) struct BridgeCustomerService {
    api: BridgeApi,
    mapper: Mapper,
}

impl BridgeCustomerService {
    pub fn new(api: BridgeApi, mapper: Mapper) -> Self {
        Self { api, mapper }
    }
}

#[async_trait]
impl CustomerService for BridgeCustomerService {
    async fn me(&self) -> Result<Customer> {
        let wire: WireCustomer = self.api.get("/customers/me").await?;
        Ok(self.mapper.customer(wire))
    }

    async fn update(&self, update: &UpdateCustomer) -> Result<Customer> {
        let wire: WireCustomer = self.api.put("/customers/me", update).await?;
        Ok(self.mapper.customer(wire))
    }

    async fn register(&self, registration: &RegisterCustomer) -> Result<Customer> {
        let wire: WireCustomer = self.api.post("/customers/register", registration).await?;
        Ok(self.mapper.customer(wire))
    }

    async fn addresses(&self) -> Result<Vec<Address>> {
        let wire: Vec<WireAddress> = self.api.get(ADDRESSES).await?;
        Ok(wire.into_iter().map(|a| self.mapper.address(a)).collect())
    }

    async fn add_address(&self, address: &Address) -> Result<Address> {
        let wire: WireAddress = self.api.post(ADDRESSES, &WireAddress::from(address)).await?;
        Ok(self.mapper.address(wire))
    }

    async fn update_address(&self, id: &AddressId, address: &Address) -> Result<Address> {
        let path = format!("{}/{}", ADDRESSES, segment(id.as_str()));
        let wire: WireAddress = self.api.put(&path, &WireAddress::from(address)).await?;
        Ok(self.mapper.address(wire))
    }

    async fn delete_address(&self, id: &AddressId) -> Result<()> {
        self.api
            .delete_empty(&format!("{}/{}", ADDRESSES, segment(id.as_str())))
            .await
    }
}
