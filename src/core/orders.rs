use crate::core::geometry::find_containing_zone;
use crate::core::ids::next_id;
use crate::domain::model::{
    NewOrder, Order, OrderFilters, OrderStatus, OrderStatusLog, OrderUpdate, Proof,
};
use crate::domain::ports::{OrderRepository, RiderRepository, WarehouseRepository, ZoneRepository};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_point};
use chrono::{DateTime, NaiveTime, Utc};

pub struct OrderService<'a, S> {
    store: &'a mut S,
    actor: String,
}

impl<'a, S> OrderService<'a, S>
where
    S: OrderRepository + ZoneRepository + WarehouseRepository + RiderRepository,
{
    pub fn new(store: &'a mut S, actor: impl Into<String>) -> Self {
        Self {
            store,
            actor: actor.into(),
        }
    }

    pub fn list_orders(&self, filters: &OrderFilters) -> Vec<&Order> {
        let search = filters.search.as_ref().map(|q| q.trim().to_lowercase());
        let from = filters
            .date_from
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        // exclusive: midnight after date_to
        let until = filters
            .date_to
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());

        self.store
            .orders()
            .iter()
            .filter(|o| filters.statuses.is_empty() || filters.statuses.contains(&o.status))
            .filter(|o| filters.types.is_empty() || filters.types.contains(&o.order_type))
            .filter(|o| match &filters.zone_id {
                Some(zone_id) => o.zone_id.as_deref() == Some(zone_id.as_str()),
                None => true,
            })
            .filter(|o| match &filters.warehouse_id {
                Some(warehouse_id) => &o.warehouse_id == warehouse_id,
                None => true,
            })
            .filter(|o| match search.as_deref() {
                Some(q) if !q.is_empty() => matches_search(o, q),
                _ => true,
            })
            .filter(|o| from.map(|f| o.created_at >= f).unwrap_or(true))
            .filter(|o| until.map(|t| o.created_at < t).unwrap_or(true))
            .collect()
    }

    pub fn get_order(&self, id: &str) -> Result<&Order> {
        self.store
            .order(id)
            .ok_or_else(|| AdminError::not_found("Order", id))
    }

    /// Oldest first.
    pub fn order_logs(&self, order_id: &str) -> Vec<OrderStatusLog> {
        let mut logs = self.store.status_logs(order_id);
        logs.sort_by_key(|l| l.created_at);
        logs
    }

    pub fn order_proof(&self, order_id: &str) -> Option<&Proof> {
        self.store.proof(order_id)
    }

    /// 手動建立訂單：區域在建立當下依座標判定一次，之後不再重新計算
    pub fn create_order(&mut self, data: NewOrder) -> Result<Order> {
        validate_non_empty_string("customer_name", &data.customer_name)?;
        validate_non_empty_string("customer_phone", &data.customer_phone)?;
        validate_point(&data.location)?;
        if self.store.warehouse(&data.warehouse_id).is_none() {
            return Err(AdminError::not_found("Warehouse", &data.warehouse_id));
        }

        let zone_id = find_containing_zone(&data.location, self.store.zones()).map(|z| z.id.clone());
        if zone_id.is_none() {
            tracing::warn!(
                "⚠️ No zone found for ({}, {}); order stays unassigned",
                data.location.lng,
                data.location.lat
            );
        }

        let now = Utc::now();
        let order = Order {
            id: next_id("ord"),
            order_type: data.order_type,
            status: OrderStatus::Pending,
            warehouse_id: data.warehouse_id,
            zone_id,
            rider_id: None,
            customer_name: data.customer_name.trim().to_string(),
            customer_phone: data.customer_phone.trim().to_string(),
            short_national_address: data.short_national_address,
            lat: data.location.lat,
            lng: data.location.lng,
            pod_required: data.pod_required,
            notes: data.notes.filter(|n| !n.trim().is_empty()),
            parent_order_id: data.parent_order_id,
            source_ref: data.source_ref,
            auto_assigned: false,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_order(order.clone());
        self.log_status(&order.id, OrderStatus::Pending, "Order created manually", now);
        tracing::info!(
            "✅ Order {} created (zone: {})",
            order.id,
            order.zone_id.as_deref().unwrap_or("unassigned")
        );
        Ok(order)
    }

    pub fn update_order(&mut self, id: &str, changes: OrderUpdate) -> Result<Order> {
        let mut order = self.get_order(id)?.clone();
        if let Some(notes) = changes.notes {
            order.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        if let Some(address) = changes.short_national_address {
            order.short_national_address = address;
        }
        if let Some(pod) = changes.pod_required {
            order.pod_required = pod;
        }
        order.updated_at = Utc::now();
        self.store.save_order(order.clone());
        Ok(order)
    }

    pub fn cancel_order(&mut self, id: &str) -> Result<Order> {
        let mut order = self.get_order(id)?.clone();
        let now = Utc::now();
        order.status = OrderStatus::Cancelled;
        order.updated_at = now;
        self.store.save_order(order.clone());
        self.log_status(id, OrderStatus::Cancelled, "Order cancelled by admin", now);
        tracing::info!("🚫 Order {} cancelled", id);
        Ok(order)
    }

    pub fn reassign_order(&mut self, order_id: &str, rider_id: &str) -> Result<Order> {
        if self.store.rider(rider_id).is_none() {
            return Err(AdminError::not_found("Rider", rider_id));
        }
        let mut order = self.get_order(order_id)?.clone();
        let now = Utc::now();
        order.rider_id = Some(rider_id.to_string());
        order.status = OrderStatus::Assigned;
        order.auto_assigned = false;
        order.updated_at = now;
        self.store.save_order(order.clone());
        self.log_status(
            order_id,
            OrderStatus::Assigned,
            "Reassigned to rider by admin",
            now,
        );
        tracing::info!("🔁 Order {} reassigned to {}", order_id, rider_id);
        Ok(order)
    }

    fn log_status(&mut self, order_id: &str, status: OrderStatus, note: &str, at: DateTime<Utc>) {
        self.store.append_status_log(OrderStatusLog {
            id: next_id("log"),
            order_id: order_id.to_string(),
            status,
            note: Some(note.to_string()),
            changed_by: self.actor.clone(),
            created_at: at,
        });
    }
}

fn matches_search(order: &Order, query: &str) -> bool {
    order.customer_name.to_lowercase().contains(query)
        || order.customer_phone.contains(query)
        || order.short_national_address.to_lowercase().contains(query)
        || order.id.to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixtures::Fixtures;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::model::{OrderType, Point};

    fn new_order(lng: f64, lat: f64) -> NewOrder {
        NewOrder {
            order_type: OrderType::Delivery,
            warehouse_id: "wh-001".to_string(),
            customer_name: "Sara Al-Faisal".to_string(),
            customer_phone: "+966551000099".to_string(),
            short_national_address: "ABCD9999".to_string(),
            location: Point::new(lng, lat),
            pod_required: true,
            notes: Some(String::new()),
            parent_order_id: None,
            source_ref: None,
        }
    }

    #[test]
    fn test_create_detects_zone() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let mut service = OrderService::new(&mut store, "admin-001");
        let order = service.create_order(new_order(46.68, 24.79)).unwrap();
        assert_eq!(order.zone_id.as_deref(), Some("zone-001"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.notes.is_none());

        let logs = service.order_logs(&order.id);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].changed_by, "admin-001");
    }

    #[test]
    fn test_create_outside_every_zone() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let mut service = OrderService::new(&mut store, "admin-001");
        let order = service.create_order(new_order(46.90, 24.90)).unwrap();
        assert!(order.zone_id.is_none());
    }

    #[test]
    fn test_create_requires_fields() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let mut service = OrderService::new(&mut store, "admin-001");

        let mut missing_name = new_order(46.68, 24.79);
        missing_name.customer_name = " ".to_string();
        assert!(service.create_order(missing_name).is_err());

        let mut bad_warehouse = new_order(46.68, 24.79);
        bad_warehouse.warehouse_id = "wh-404".to_string();
        assert!(matches!(
            service.create_order(bad_warehouse),
            Err(AdminError::NotFound { .. })
        ));
    }

    #[test]
    fn test_date_range_covers_whole_days() {
        let mut fixtures = Fixtures::builtin();
        let stamps = [
            ("ord-001", "2024-04-01T00:00:00Z"),
            ("ord-002", "2024-04-01T23:59:59.500Z"),
            ("ord-003", "2024-04-02T00:00:00Z"),
            ("ord-005", "2024-03-31T23:59:59.999Z"),
        ];
        for (id, at) in stamps {
            let order = fixtures.orders.iter_mut().find(|o| o.id == id).unwrap();
            order.created_at = at.parse::<DateTime<Utc>>().unwrap();
        }
        let mut store = InMemoryStore::from_fixtures(fixtures);
        let service = OrderService::new(&mut store, "admin-001");

        let day = chrono::NaiveDate::from_ymd_opt(2024, 4, 1);
        let filters = OrderFilters {
            date_from: day,
            date_to: day,
            ..Default::default()
        };
        let mut ids: Vec<&str> = service
            .list_orders(&filters)
            .into_iter()
            .map(|o| o.id.as_str())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["ord-001", "ord-002"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let service = OrderService::new(&mut store, "admin-001");
        let filters = OrderFilters {
            search: Some("SARA".to_string()),
            ..Default::default()
        };
        let found = service.list_orders(&filters);
        assert!(!found.is_empty());
        assert!(found.iter().all(|o| o.customer_name.to_lowercase().contains("sara")));
    }

    #[test]
    fn test_filter_by_status_and_zone() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let service = OrderService::new(&mut store, "admin-001");
        let filters = OrderFilters {
            statuses: vec![OrderStatus::Pending],
            zone_id: Some("zone-003".to_string()),
            ..Default::default()
        };
        let found = service.list_orders(&filters);
        assert!(found
            .iter()
            .all(|o| o.status == OrderStatus::Pending && o.zone_id.as_deref() == Some("zone-003")));
    }

    #[test]
    fn test_update_order_fields() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let mut service = OrderService::new(&mut store, "admin-001");
        let updated = service
            .update_order(
                "ord-006",
                OrderUpdate {
                    notes: Some("Leave at reception".to_string()),
                    pod_required: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Leave at reception"));
        assert!(!updated.pod_required);
    }
}
