use crate::{
    db::Database,
    entities::vendor,
    errors::ServiceError,
    ids,
    services::{check_patch_text, not_blank},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use tracing::{info, instrument};
use validator::Validate;

/// Performance figures tracked per vendor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VendorPerformance {
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

/// Input for registering a vendor
#[derive(Debug, Clone, Validate)]
pub struct NewVendor {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "not_blank")]
    pub contact_details: String,
    #[validate(custom = "not_blank")]
    pub address: String,
    pub performance: VendorPerformance,
}

impl NewVendor {
    pub fn new(
        name: impl Into<String>,
        contact_details: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contact_details: contact_details.into(),
            address: address.into(),
            performance: VendorPerformance::default(),
        }
    }
}

/// Partial update: `None` fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct VendorPatch {
    pub name: Option<String>,
    pub contact_details: Option<String>,
    pub address: Option<String>,
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}

impl VendorPatch {
    fn validate(&self) -> Result<(), ServiceError> {
        check_patch_text("name", self.name.as_ref())?;
        check_patch_text("contact_details", self.contact_details.as_ref())?;
        check_patch_text("address", self.address.as_ref())
    }

    fn apply(self, active: &mut vendor::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(contact_details) = self.contact_details {
            active.contact_details = Set(contact_details);
        }
        if let Some(address) = self.address {
            active.address = Set(address);
        }
        if let Some(rate) = self.on_time_delivery_rate {
            active.on_time_delivery_rate = Set(rate);
        }
        if let Some(avg) = self.quality_rating_avg {
            active.quality_rating_avg = Set(avg);
        }
        if let Some(time) = self.average_response_time {
            active.average_response_time = Set(time);
        }
        if let Some(rate) = self.fulfillment_rate {
            active.fulfillment_rate = Set(rate);
        }
    }
}

async fn vendor_code_taken<C: ConnectionTrait>(
    conn: &C,
    candidate: String,
) -> Result<bool, ServiceError> {
    Ok(vendor::Entity::find_by_id(candidate)
        .one(conn)
        .await?
        .is_some())
}

/// Store for vendor records
#[derive(Debug, Clone)]
pub struct VendorService {
    db: Database,
}

impl VendorService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registers a vendor and returns its generated code
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewVendor) -> Result<String, ServiceError> {
        input.validate()?;

        let vendor_code = self
            .db
            .transaction("vendor.create", move |txn| {
                Box::pin(async move {
                    let vendor_code =
                        ids::generate_id(|candidate| vendor_code_taken(txn, candidate)).await?;
                    let now = Utc::now();
                    let performance = input.performance;

                    let model = vendor::ActiveModel {
                        vendor_code: Set(vendor_code.clone()),
                        name: Set(input.name),
                        contact_details: Set(input.contact_details),
                        address: Set(input.address),
                        on_time_delivery_rate: Set(performance.on_time_delivery_rate),
                        quality_rating_avg: Set(performance.quality_rating_avg),
                        average_response_time: Set(performance.average_response_time),
                        fulfillment_rate: Set(performance.fulfillment_rate),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    vendor::Entity::insert(model)
                        .exec_without_returning(txn)
                        .await?;

                    Ok(vendor_code)
                })
            })
            .await?;

        info!(vendor_code = %vendor_code, "Vendor created");
        Ok(vendor_code)
    }

    /// Looks up a vendor, `None` when absent
    #[instrument(skip(self))]
    pub async fn find(&self, vendor_code: &str) -> Result<Option<vendor::Model>, ServiceError> {
        let vendor_code = vendor_code.to_string();
        self.db
            .execute("vendor.find", |conn| {
                vendor::Entity::find_by_id(vendor_code).one(conn)
            })
            .await
    }

    /// Looks up a vendor, `NotFound` when absent
    pub async fn get(&self, vendor_code: &str) -> Result<vendor::Model, ServiceError> {
        self.find(vendor_code)
            .await?
            .ok_or_else(|| ServiceError::vendor_not_found(vendor_code))
    }

    /// Every vendor in insertion order
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<vendor::Model>, ServiceError> {
        self.db
            .execute("vendor.list_all", |conn| {
                vendor::Entity::find()
                    .order_by_asc(vendor::Column::CreatedAt)
                    .order_by_asc(vendor::Column::VendorCode)
                    .all(conn)
            })
            .await
    }

    /// Writes the fields present in `patch`; the vendor code never changes
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        vendor_code: &str,
        patch: VendorPatch,
    ) -> Result<vendor::Model, ServiceError> {
        patch.validate()?;
        let code = vendor_code.to_string();

        let updated = self
            .db
            .transaction("vendor.update", move |txn| {
                Box::pin(async move {
                    let existing = vendor::Entity::find_by_id(code.clone())
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::vendor_not_found(&code))?;

                    let mut active: vendor::ActiveModel = existing.into();
                    patch.apply(&mut active);
                    active.updated_at = Set(Utc::now());

                    Ok(active.update(txn).await?)
                })
            })
            .await?;

        info!(vendor_code = %updated.vendor_code, "Vendor updated");
        Ok(updated)
    }

    /// Removes a vendor; its purchase orders are left in place
    #[instrument(skip(self))]
    pub async fn delete(&self, vendor_code: &str) -> Result<(), ServiceError> {
        let code = vendor_code.to_string();

        self.db
            .transaction("vendor.delete", move |txn| {
                Box::pin(async move {
                    let result = vendor::Entity::delete_by_id(code.clone()).exec(txn).await?;
                    if result.rows_affected == 0 {
                        return Err(ServiceError::vendor_not_found(&code));
                    }
                    Ok(())
                })
            })
            .await?;

        info!(vendor_code = %vendor_code, "Vendor deleted");
        Ok(())
    }
}
