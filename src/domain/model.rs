use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw GeoJSON position, longitude first.
pub type Position = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lng: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn position(&self) -> Position {
        [self.lng, self.lat]
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Self::new(p[0], p[1])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Polygon,
}

/// GeoJSON `Polygon` geometry restricted to a single outer ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub geometry_type: GeometryType,
    pub coordinates: Vec<Vec<Position>>,
}

impl PolygonGeometry {
    pub fn from_ring(ring: Vec<Position>) -> Self {
        Self {
            geometry_type: GeometryType::Polygon,
            coordinates: vec![ring],
        }
    }

    pub fn outer_ring(&self) -> &[Position] {
        self.coordinates.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ring_count(&self) -> usize {
        self.coordinates.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub warehouse_ids: Vec<String>,
    pub polygon: PolygonGeometry,
    pub created_at: DateTime<Utc>,
}

impl Zone {
    pub fn is_served_by(&self, warehouse_id: &str) -> bool {
        self.warehouse_ids.iter().any(|w| w == warehouse_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    pub short_national_address: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub is_active: bool,
    #[serde(default)]
    pub warehouse_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderZone {
    pub id: String,
    pub rider_id: String,
    pub zone_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderLocation {
    pub rider_id: String,
    pub lat: f64,
    pub lng: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Delivery,
    ReturnPickup,
    FailedReturn,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [Self::Delivery, Self::ReturnPickup, Self::FailedReturn];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::ReturnPickup => "Return Pickup",
            Self::FailedReturn => "Failed Return",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::ReturnPickup => "return_pickup",
            Self::FailedReturn => "failed_return",
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown order type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Failed,
    Returning,
    ReturnedToWarehouse,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 9] = [
        Self::Pending,
        Self::Assigned,
        Self::PickedUp,
        Self::InTransit,
        Self::Delivered,
        Self::Failed,
        Self::Returning,
        Self::ReturnedToWarehouse,
        Self::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::PickedUp => "Picked Up",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
            Self::Returning => "Returning",
            Self::ReturnedToWarehouse => "Returned",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::PickedUp => "picked_up",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Returning => "returning",
            Self::ReturnedToWarehouse => "returned_to_warehouse",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status '{}'", s))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub warehouse_id: String,
    /// Snapshot taken when the order was created; never re-derived.
    pub zone_id: Option<String>,
    pub rider_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub short_national_address: String,
    pub lat: f64,
    pub lng: f64,
    pub pod_required: bool,
    pub notes: Option<String>,
    pub parent_order_id: Option<String>,
    pub source_ref: Option<String>,
    pub auto_assigned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn location(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

/// Order creation payload; id, status and timestamps are assigned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub warehouse_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub short_national_address: String,
    pub location: Point,
    #[serde(default)]
    pub pod_required: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub parent_order_id: Option<String>,
    #[serde(default)]
    pub source_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub notes: Option<String>,
    pub short_national_address: Option<String>,
    pub pod_required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusLog {
    pub id: String,
    pub order_id: String,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub changed_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofType {
    DeliveryPod,
    ReturnPod,
    FailedPod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    pub id: String,
    pub order_id: String,
    #[serde(rename = "type")]
    pub proof_type: ProofType,
    pub photo_url: String,
    pub signature_url: Option<String>,
    pub failure_reason: Option<String>,
    pub item_condition_note: Option<String>,
    pub submitted_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilters {
    pub statuses: Vec<OrderStatus>,
    pub types: Vec<OrderType>,
    pub zone_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    /// Inclusive: the whole day is covered.
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiderFilters {
    pub zone_id: Option<String>,
    pub active_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseUpdate {
    pub name: Option<String>,
    pub short_national_address: Option<String>,
}
