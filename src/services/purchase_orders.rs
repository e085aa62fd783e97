use crate::{
    db::Database,
    entities::{purchase_order, vendor},
    errors::ServiceError,
    ids,
    services::{check_patch_text, not_blank},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Json, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Filter value meaning "every purchase order"
pub const ALL_VENDORS: &str = "All";

/// Input for creating a purchase order
#[derive(Debug, Clone, Validate)]
pub struct NewPurchaseOrder {
    #[validate(custom = "not_blank")]
    pub vendor_code: String,
    pub items: Json,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub quantity: i32,
    #[validate(custom = "not_blank")]
    pub status: String,
    pub issue_date: DateTime<Utc>,
    pub quality_rating: Option<f64>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

/// Partial update: `None` fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct PurchaseOrderPatch {
    pub vendor_code: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    pub items: Option<Json>,
    pub quantity: Option<i32>,
    pub status: Option<String>,
}

impl PurchaseOrderPatch {
    fn validate(&self) -> Result<(), ServiceError> {
        check_patch_text("vendor_code", self.vendor_code.as_ref())?;
        check_patch_text("status", self.status.as_ref())
    }

    fn apply(self, active: &mut purchase_order::ActiveModel) {
        if let Some(vendor_code) = self.vendor_code {
            active.vendor_code = Set(vendor_code);
        }
        if let Some(order_date) = self.order_date {
            active.order_date = Set(order_date);
        }
        if let Some(items) = self.items {
            active.items = Set(items);
        }
        if let Some(quantity) = self.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
    }
}

/// Which purchase orders a listing covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorFilter {
    All,
    VendorCode(String),
}

impl VendorFilter {
    /// `"All"` selects everything, anything else is an exact vendor code
    pub fn parse(value: &str) -> Self {
        if value == ALL_VENDORS {
            VendorFilter::All
        } else {
            VendorFilter::VendorCode(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VendorFilter::All => ALL_VENDORS,
            VendorFilter::VendorCode(code) => code,
        }
    }
}

/// A vendor referenced by at least one purchase order
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VendorFacet {
    pub vendor_code: String,
    /// Current vendor name; `None` once the vendor has been deleted
    pub vendor_name: Option<String>,
}

/// A purchase order with the current name of the vendor it references
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PurchaseOrderView {
    #[serde(flatten)]
    pub purchase_order: purchase_order::Model,
    pub vendor_name: Option<String>,
}

async fn po_id_taken<C: ConnectionTrait>(conn: &C, candidate: String) -> Result<bool, ServiceError> {
    Ok(purchase_order::Entity::find_by_id(candidate)
        .one(conn)
        .await?
        .is_some())
}

/// Store for purchase-order records
#[derive(Debug, Clone)]
pub struct PurchaseOrderService {
    db: Database,
}

impl PurchaseOrderService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persists a purchase order under a freshly generated id
    #[instrument(skip(self, input), fields(vendor_code = %input.vendor_code))]
    pub async fn create(&self, input: NewPurchaseOrder) -> Result<String, ServiceError> {
        input.validate()?;

        let po_id = self
            .db
            .transaction("purchase_order.create", move |txn| {
                Box::pin(async move {
                    let po_id = ids::generate_id(|candidate| po_id_taken(txn, candidate)).await?;
                    let now = Utc::now();

                    let model = purchase_order::ActiveModel {
                        po_id: Set(po_id.clone()),
                        vendor_code: Set(input.vendor_code),
                        order_date: Set(input.order_date),
                        delivery_date: Set(input.delivery_date),
                        items: Set(input.items),
                        quantity: Set(input.quantity),
                        status: Set(input.status),
                        quality_rating: Set(input.quality_rating),
                        issue_date: Set(input.issue_date),
                        acknowledgment_date: Set(input.acknowledgment_date),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    purchase_order::Entity::insert(model)
                        .exec_without_returning(txn)
                        .await?;

                    Ok(po_id)
                })
            })
            .await?;

        info!(po_id = %po_id, "Purchase order created");
        Ok(po_id)
    }

    #[instrument(skip(self))]
    pub async fn find(&self, po_id: &str) -> Result<Option<purchase_order::Model>, ServiceError> {
        let po_id = po_id.to_string();
        self.db
            .execute("purchase_order.find", |conn| {
                purchase_order::Entity::find_by_id(po_id).one(conn)
            })
            .await
    }

    pub async fn get(&self, po_id: &str) -> Result<purchase_order::Model, ServiceError> {
        self.find(po_id)
            .await?
            .ok_or_else(|| ServiceError::purchase_order_not_found(po_id))
    }

    /// Looks up a purchase order together with its vendor's name
    #[instrument(skip(self))]
    pub async fn get_view(&self, po_id: &str) -> Result<PurchaseOrderView, ServiceError> {
        let purchase_order = self.get(po_id).await?;
        let vendor_code = purchase_order.vendor_code.clone();
        let vendor_name = self
            .db
            .execute("purchase_order.vendor_name", |conn| {
                vendor::Entity::find_by_id(vendor_code).one(conn)
            })
            .await?
            .map(|v| v.name);

        Ok(PurchaseOrderView {
            purchase_order,
            vendor_name,
        })
    }

    /// Every purchase order in insertion order
    pub async fn list_all(&self) -> Result<Vec<purchase_order::Model>, ServiceError> {
        self.list_by_vendor(&VendorFilter::All).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_vendor(
        &self,
        filter: &VendorFilter,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let mut query = purchase_order::Entity::find();
        if let VendorFilter::VendorCode(code) = filter {
            query = query.filter(purchase_order::Column::VendorCode.eq(code.as_str()));
        }

        self.db
            .execute("purchase_order.list", |conn| {
                query
                    .order_by_asc(purchase_order::Column::CreatedAt)
                    .order_by_asc(purchase_order::Column::PoId)
                    .all(conn)
            })
            .await
    }

    /// Distinct vendor codes referenced by purchase orders, with names joined from vendors
    #[instrument(skip(self))]
    pub async fn vendor_facets(&self) -> Result<Vec<VendorFacet>, ServiceError> {
        let codes: Vec<String> = self
            .db
            .execute("purchase_order.vendor_codes", |conn| {
                purchase_order::Entity::find()
                    .select_only()
                    .column(purchase_order::Column::VendorCode)
                    .distinct()
                    .order_by_asc(purchase_order::Column::VendorCode)
                    .into_tuple::<String>()
                    .all(conn)
            })
            .await?;

        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let lookup = codes.clone();
        let names: HashMap<String, String> = self
            .db
            .execute("purchase_order.vendor_names", |conn| {
                vendor::Entity::find()
                    .filter(vendor::Column::VendorCode.is_in(lookup))
                    .all(conn)
            })
            .await?
            .into_iter()
            .map(|v| (v.vendor_code, v.name))
            .collect();

        Ok(codes
            .into_iter()
            .map(|vendor_code| VendorFacet {
                vendor_name: names.get(&vendor_code).cloned(),
                vendor_code,
            })
            .collect())
    }

    /// Writes the fields present in `patch`; the id never changes
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        po_id: &str,
        patch: PurchaseOrderPatch,
    ) -> Result<purchase_order::Model, ServiceError> {
        patch.validate()?;
        let id = po_id.to_string();

        let updated = self
            .db
            .transaction("purchase_order.update", move |txn| {
                Box::pin(async move {
                    let existing = purchase_order::Entity::find_by_id(id.clone())
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::purchase_order_not_found(&id))?;

                    let mut active: purchase_order::ActiveModel = existing.into();
                    patch.apply(&mut active);
                    active.updated_at = Set(Utc::now());

                    Ok(active.update(txn).await?)
                })
            })
            .await?;

        info!(po_id = %updated.po_id, "Purchase order updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, po_id: &str) -> Result<(), ServiceError> {
        let id = po_id.to_string();

        self.db
            .transaction("purchase_order.delete", move |txn| {
                Box::pin(async move {
                    let result = purchase_order::Entity::delete_by_id(id.clone())
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Err(ServiceError::purchase_order_not_found(&id));
                    }
                    Ok(())
                })
            })
            .await?;

        info!(po_id = %po_id, "Purchase order deleted");
        Ok(())
    }
}
