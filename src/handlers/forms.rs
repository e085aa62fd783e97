//! Fixed HTML forms. Update forms post back to their own URL and leave blank fields
//! untouched, so none of them needs per-record rendering.

pub const NEW_VENDOR: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>New vendor</title></head>
<body>
<h1>Register vendor</h1>
<form method="post" action="/api/vendor/">
  <label>Name <input type="text" name="name" required></label>
  <label>Contact details <input type="text" name="contact" required></label>
  <label>Address <textarea name="address" required></textarea></label>
  <label>On-time delivery rate <input type="number" step="any" name="on_time_delivery_rate"></label>
  <label>Average quality rating <input type="number" step="any" name="quality_rating_avg"></label>
  <label>Average response time <input type="number" step="any" name="average_response_time"></label>
  <label>Fulfillment rate <input type="number" step="any" name="fulfillment_rate"></label>
  <button type="submit">Create</button>
</form>
<p><a href="/api/vendors/">All vendors</a> | <a href="/purchase/">New purchase order</a></p>
</body>
</html>
"#;

pub const UPDATE_VENDOR: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Update vendor</title></head>
<body>
<h1>Update vendor</h1>
<p>Blank fields keep their current value.</p>
<form method="post">
  <label>Name <input type="text" name="name"></label>
  <label>Contact details <input type="text" name="contact"></label>
  <label>Address <textarea name="address"></textarea></label>
  <label>On-time delivery rate <input type="number" step="any" name="on_time_delivery_rate"></label>
  <label>Average quality rating <input type="number" step="any" name="quality_rating_avg"></label>
  <label>Average response time <input type="number" step="any" name="average_response_time"></label>
  <label>Fulfillment rate <input type="number" step="any" name="fulfillment_rate"></label>
  <button type="submit">Save</button>
</form>
</body>
</html>
"#;

pub const NEW_PURCHASE_ORDER: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>New purchase order</title></head>
<body>
<h1>Create purchase order</h1>
<form method="post" action="/api/purchase_order/">
  <label>Vendor code <input type="text" name="vendor_code" required></label>
  <label>Items (JSON) <textarea name="items" required></textarea></label>
  <label>Quantity <input type="number" name="quantity" required></label>
  <label>Status <input type="text" name="status" required></label>
  <label>Order date <input type="datetime-local" name="order_date" required></label>
  <label>Delivery date <input type="datetime-local" name="delivery_date" required></label>
  <label>Issue date <input type="datetime-local" name="issue_date" required></label>
  <label>Quality rating <input type="number" step="any" name="quality_rating"></label>
  <label>Acknowledgment date <input type="datetime-local" name="acknowledgment_date"></label>
  <button type="submit">Create</button>
</form>
<p><a href="/api/purchase_orders/">All purchase orders</a></p>
</body>
</html>
"#;

pub const UPDATE_PURCHASE_ORDER: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Update purchase order</title></head>
<body>
<h1>Update purchase order</h1>
<p>Blank fields keep their current value.</p>
<form method="post">
  <label>Vendor code <input type="text" name="vendor_code"></label>
  <label>Order date <input type="datetime-local" name="order_date"></label>
  <label>Items (JSON) <textarea name="items"></textarea></label>
  <label>Quantity <input type="number" name="quantity"></label>
  <label>Status <input type="text" name="status"></label>
  <button type="submit">Save</button>
</form>
</body>
</html>
"#;
