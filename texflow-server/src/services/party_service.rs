//! Party Service - suppliers and customers

use shared::models::{
    Customer, CustomerCreate, CustomerUpdate, Supplier, SupplierCreate, SupplierUpdate,
};
use shared::util::now_millis;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{CustomerData, SupplierData};
use crate::db::repository::{CustomerRepository, SupplierRepository, customer, record_id, supplier};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct PartyService {
    suppliers: SupplierRepository,
    customers: CustomerRepository,
}

impl std::fmt::Debug for PartyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartyService").finish_non_exhaustive()
    }
}

impl PartyService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            suppliers: SupplierRepository::new(db.clone()),
            customers: CustomerRepository::new(db),
        }
    }

    // ── Suppliers ───────────────────────────────────────────────────

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        Ok(self.suppliers.find_all().await?)
    }

    pub async fn create_supplier(&self, input: SupplierCreate) -> AppResult<Supplier> {
        let name = input.name.unwrap_or_default().trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&input.contact, "contact", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&input.email, "email", MAX_EMAIL_LEN)?;

        let created = self
            .suppliers
            .create(SupplierData {
                name,
                contact: input.contact.unwrap_or_default(),
                email: input.email.unwrap_or_default(),
                created_at: now_millis(),
            })
            .await?;
        tracing::info!(supplier_id = %created.id, "Supplier created");
        Ok(created)
    }

    pub async fn update_supplier(&self, id: &str, patch: SupplierUpdate) -> AppResult<Supplier> {
        let rid = rid(supplier::TABLE, "Supplier", id)?;
        let existing = self
            .suppliers
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| not_found("Supplier", id))?;

        let name = match patch.name {
            Some(name) => {
                validate_required_text(&name, "name", MAX_NAME_LEN)?;
                name.trim().to_string()
            }
            None => existing.name,
        };
        validate_optional_text(&patch.contact, "contact", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&patch.email, "email", MAX_EMAIL_LEN)?;

        let data = SupplierData {
            name,
            contact: patch.contact.unwrap_or(existing.contact),
            email: patch.email.unwrap_or(existing.email),
            created_at: existing.created_at,
        };
        Ok(self.suppliers.update(&rid, data).await?)
    }

    pub async fn delete_supplier(&self, id: &str) -> AppResult<()> {
        let rid = rid(supplier::TABLE, "Supplier", id)?;
        if !self.suppliers.delete(&rid).await? {
            return Err(not_found("Supplier", id));
        }
        tracing::info!(supplier_id = %id, "Supplier deleted");
        Ok(())
    }

    // ── Customers ───────────────────────────────────────────────────

    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(self.customers.find_all().await?)
    }

    pub async fn create_customer(&self, input: CustomerCreate) -> AppResult<Customer> {
        let name = input.name.unwrap_or_default().trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&input.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&input.email, "email", MAX_EMAIL_LEN)?;

        let created = self
            .customers
            .create(CustomerData {
                name,
                phone: input.phone.unwrap_or_default(),
                email: input.email.unwrap_or_default(),
                created_at: now_millis(),
            })
            .await?;
        tracing::info!(customer_id = %created.id, "Customer created");
        Ok(created)
    }

    pub async fn update_customer(&self, id: &str, patch: CustomerUpdate) -> AppResult<Customer> {
        let rid = rid(customer::TABLE, "Customer", id)?;
        let existing = self
            .customers
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| not_found("Customer", id))?;

        let name = match patch.name {
            Some(name) => {
                validate_required_text(&name, "name", MAX_NAME_LEN)?;
                name.trim().to_string()
            }
            None => existing.name,
        };
        validate_optional_text(&patch.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&patch.email, "email", MAX_EMAIL_LEN)?;

        let data = CustomerData {
            name,
            phone: patch.phone.unwrap_or(existing.phone),
            email: patch.email.unwrap_or(existing.email),
            created_at: existing.created_at,
        };
        Ok(self.customers.update(&rid, data).await?)
    }

    pub async fn delete_customer(&self, id: &str) -> AppResult<()> {
        let rid = rid(customer::TABLE, "Customer", id)?;
        if !self.customers.delete(&rid).await? {
            return Err(not_found("Customer", id));
        }
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}

fn rid(table: &str, kind: &str, id: &str) -> AppResult<RecordId> {
    record_id(table, id).ok_or_else(|| not_found(kind, id))
}

fn not_found(kind: &str, id: &str) -> AppError {
    AppError::not_found(format!("{} {} not found", kind, id))
}
