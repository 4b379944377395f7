use parfum_core::{OrderSummary, StorefrontProfile};

use crate::format_amount;
use crate::pdf::{
    ellipsize, wrap_text, write_document, Canvas, DocumentInfo, Font, Rgb, PAGE_WIDTH,
};

const LEFT: f32 = 40.0;
const RIGHT: f32 = 555.0;

const COL_ITEM: f32 = LEFT;
const COL_QTY: f32 = 330.0;
const COL_PRICE: f32 = 400.0;
const ITEM_WIDTH: f32 = 280.0;

const ADDRESS_WIDTH: f32 = 260.0;
const ADDRESS_MAX_LINES: usize = 4;
const NOTES_WIDTH: f32 = 270.0;
const NOTES_MAX_LINES: usize = 4;

const ROW_HEIGHT: f32 = 22.0;
/// Lowest baseline an item row may use; below it sit the total and footer.
const TABLE_FLOOR: f32 = 250.0;

const TOTAL_BOX_X: f32 = 330.0;
const TOTAL_BOX_HEIGHT: f32 = 36.0;

const INK: Rgb = Rgb(0.13, 0.11, 0.10);
const ACCENT: Rgb = Rgb(0.78, 0.64, 0.38);
const MUTED: Rgb = Rgb::gray(0.45);
const HAIRLINE: Rgb = Rgb::gray(0.82);

/// Render `summary` as a one-page A4 PDF.
///
/// Item rows that do not fit above the total block are folded into a single
/// `+ N more item(s)` row.
#[must_use]
pub fn render_invoice(summary: &OrderSummary, profile: &StorefrontProfile) -> Vec<u8> {
    let mut canvas = Canvas::new();

    header(&mut canvas, summary, profile);
    let y = client_block(&mut canvas, summary);
    let (y, hidden) = item_table(&mut canvas, summary, y - 16.0);
    total_block(&mut canvas, summary, profile, y);
    footer(&mut canvas, summary, profile);

    let title = format!("Invoice {}", summary.order_id);
    let bytes = write_document(
        &canvas.into_content(),
        &DocumentInfo {
            title: &title,
            created_at: summary.placed_at,
        },
    );

    tracing::debug!(
        order_id = %summary.order_id,
        items = summary.items.len(),
        hidden,
        bytes = bytes.len(),
        "rendered invoice"
    );
    bytes
}

fn header(canvas: &mut Canvas, summary: &OrderSummary, profile: &StorefrontProfile) {
    canvas.fill_rect(0.0, 762.0, PAGE_WIDTH, 80.0, INK);

    let brand = ellipsize(&profile.brand_name, Font::Bold, 22.0, 300.0);
    canvas.text(Font::Bold, 22.0, LEFT, 806.0, Rgb::WHITE, &brand);
    if let Some(tagline) = &profile.tagline {
        let tagline = ellipsize(tagline, Font::Regular, 9.0, 300.0);
        canvas.text(Font::Regular, 9.0, LEFT, 788.0, ACCENT, &tagline);
    }

    canvas.text_right(Font::Bold, 16.0, RIGHT, 806.0, Rgb::WHITE, "INVOICE");
    canvas.text_right(
        Font::Regular,
        10.0,
        RIGHT,
        790.0,
        Rgb::WHITE,
        &format!("No. {}", summary.order_id),
    );
    canvas.text_right(
        Font::Regular,
        10.0,
        RIGHT,
        776.0,
        Rgb::gray(0.8),
        &summary.date_label(),
    );
}

/// Returns the baseline just below the block.
fn client_block(canvas: &mut Canvas, summary: &OrderSummary) -> f32 {
    let customer = &summary.customer;
    let mut y = 730.0;

    canvas.text(Font::Bold, 9.0, LEFT, y, MUTED, "BILLED TO");
    canvas.text_right(Font::Bold, 9.0, RIGHT, y, MUTED, "ORDER");
    y -= 18.0;

    let name = ellipsize(&customer.name, Font::Bold, 12.0, ADDRESS_WIDTH);
    canvas.text(Font::Bold, 12.0, LEFT, y, INK, &name);
    let count = summary.item_count();
    let noun = if count == 1 { "item" } else { "items" };
    canvas.text_right(Font::Regular, 10.0, RIGHT, y, INK, &format!("{count} {noun}"));
    y -= 15.0;

    let phone = ellipsize(&customer.phone, Font::Regular, 10.0, ADDRESS_WIDTH);
    canvas.text(Font::Regular, 10.0, LEFT, y, INK, &phone);
    y -= 14.0;

    if let Some(email) = &customer.email {
        let email = ellipsize(email, Font::Regular, 10.0, ADDRESS_WIDTH);
        canvas.text(Font::Regular, 10.0, LEFT, y, INK, &email);
        y -= 14.0;
    }

    if let Some(address) = &customer.address {
        for line in wrap_text(address, Font::Regular, 10.0, ADDRESS_WIDTH)
            .iter()
            .take(ADDRESS_MAX_LINES)
        {
            canvas.text(Font::Regular, 10.0, LEFT, y, INK, line);
            y -= 13.0;
        }
    }

    y
}

/// Draws the header row and as many item rows as fit. Returns the next free
/// baseline and the number of items folded into the overflow row.
fn item_table(canvas: &mut Canvas, summary: &OrderSummary, top: f32) -> (f32, usize) {
    canvas.text(Font::Bold, 9.0, COL_ITEM, top, MUTED, "ITEM");
    canvas.text(Font::Bold, 9.0, COL_QTY, top, MUTED, "QTY");
    canvas.text(Font::Bold, 9.0, COL_PRICE, top, MUTED, "PRICE");
    canvas.text_right(Font::Bold, 9.0, RIGHT, top, MUTED, "TOTAL");
    canvas.rule(LEFT, RIGHT, top - 8.0, 0.75, INK);

    let mut y = top - 26.0;

    let mut slots = 0usize;
    let mut row_y = y;
    while row_y >= TABLE_FLOOR {
        slots += 1;
        row_y -= ROW_HEIGHT;
    }
    let items = &summary.items;
    let shown = if items.len() <= slots {
        items.len()
    } else {
        slots.saturating_sub(1)
    };
    let hidden = items.len() - shown;

    for item in &items[..shown] {
        let label = format!("{} ({})", item.name, item.size);
        let label = ellipsize(&label, Font::Regular, 10.0, ITEM_WIDTH);
        canvas.text(Font::Regular, 10.0, COL_ITEM, y, INK, &label);
        canvas.text(Font::Regular, 10.0, COL_QTY, y, INK, &item.quantity.to_string());
        canvas.text(
            Font::Regular,
            10.0,
            COL_PRICE,
            y,
            INK,
            &format_amount(Some(item.unit_price)),
        );
        canvas.text_right(
            Font::Regular,
            10.0,
            RIGHT,
            y,
            INK,
            &format_amount(Some(item.line_total())),
        );
        canvas.rule(LEFT, RIGHT, y - 8.0, 0.25, HAIRLINE);
        y -= ROW_HEIGHT;
    }

    if hidden > 0 {
        let noun = if hidden == 1 { "item" } else { "items" };
        canvas.text(
            Font::Regular,
            10.0,
            COL_ITEM,
            y,
            MUTED,
            &format!("+ {hidden} more {noun}"),
        );
        canvas.rule(LEFT, RIGHT, y - 8.0, 0.25, HAIRLINE);
        y -= ROW_HEIGHT;
    }

    (y, hidden)
}

fn total_block(canvas: &mut Canvas, summary: &OrderSummary, profile: &StorefrontProfile, y: f32) {
    let top = y - 4.0;
    let bottom = top - TOTAL_BOX_HEIGHT;
    let baseline = top - 23.0;

    canvas.fill_rect(
        TOTAL_BOX_X,
        bottom,
        RIGHT - TOTAL_BOX_X,
        TOTAL_BOX_HEIGHT,
        INK,
    );
    canvas.text(Font::Bold, 11.0, TOTAL_BOX_X + 12.0, baseline, Rgb::WHITE, "GRAND TOTAL");
    canvas.text_right(
        Font::Bold,
        13.0,
        RIGHT - 12.0,
        baseline,
        ACCENT,
        &format!("{} {}", profile.currency_code, format_amount(summary.total)),
    );

    if let Some(notes) = &summary.customer.notes {
        canvas.text(Font::Bold, 9.0, LEFT, top - 12.0, MUTED, "NOTES");
        let mut line_y = top - 26.0;
        for line in wrap_text(notes, Font::Regular, 9.0, NOTES_WIDTH)
            .iter()
            .take(NOTES_MAX_LINES)
        {
            canvas.text(Font::Regular, 9.0, LEFT, line_y, INK, line);
            line_y -= 12.0;
        }
    }
}

fn footer(canvas: &mut Canvas, summary: &OrderSummary, profile: &StorefrontProfile) {
    let width = RIGHT - LEFT;
    canvas.rule(LEFT, RIGHT, 100.0, 0.5, HAIRLINE);

    let support = ellipsize(&profile.support_line(), Font::Regular, 9.0, width);
    canvas.text_centered(Font::Regular, 9.0, 84.0, INK, &support);

    let verify = format!(
        "Confirm order {} with {} on WhatsApp +{} before payment.",
        summary.order_id,
        profile.brand_name,
        profile.whatsapp_digits(),
    );
    let verify = ellipsize(&verify, Font::Regular, 8.0, width);
    canvas.text_centered(Font::Regular, 8.0, 70.0, MUTED, &verify);
    canvas.text_centered(
        Font::Regular,
        8.0,
        58.0,
        MUTED,
        "This invoice is computer generated and valid without a signature.",
    );
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use parfum_core::{CartLineItem, CustomerInfo, OrderId};
    use rust_decimal::Decimal;

    use super::*;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle.as_bytes())
    }

    fn profile() -> StorefrontProfile {
        StorefrontProfile {
            brand_name: "Maison Oud".to_string(),
            tagline: Some("Rare oils, slow perfumery".to_string()),
            whatsapp_number: "+971 50 123 4567".to_string(),
            support_email: Some("hello@maisonoud.example".to_string()),
            support_phone: None,
            currency_code: "AED".to_string(),
            order_prefix: "MO".to_string(),
        }
    }

    fn item(n: usize) -> CartLineItem {
        CartLineItem {
            product_id: format!("p{n}"),
            variant_id: "v50".to_string(),
            name: format!("Scent {n}"),
            brand: "Maison Oud".to_string(),
            image: None,
            size: "50ml".to_string(),
            unit_price: Decimal::new(12_000, 2),
            quantity: 1,
            original_price: None,
        }
    }

    fn summary(items: Vec<CartLineItem>) -> OrderSummary {
        let total = items.iter().map(CartLineItem::line_total).sum();
        OrderSummary {
            order_id: OrderId::from_number("MO", 4821),
            customer: CustomerInfo {
                name: "Layla Haddad".to_string(),
                phone: "+971 55 000 1111".to_string(),
                email: Some("layla@example.com".to_string()),
                address: Some(
                    "Apartment 1204, Marina Gate Tower 2, Dubai Marina, Dubai, United Arab Emirates"
                        .to_string(),
                ),
                notes: Some("Gift wrap please".to_string()),
            },
            items,
            total: Some(total),
            placed_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn renders_a_pdf_with_order_details() {
        let pdf = render_invoice(&summary(vec![item(1), item(2)]), &profile());
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(contains(&pdf, "(No. MO-4821)"));
        assert!(contains(&pdf, "(Layla Haddad)"));
        assert!(contains(&pdf, "Scent 2 "));
        assert!(contains(&pdf, "50ml"));
        assert!(contains(&pdf, "(GRAND TOTAL)"));
        assert!(contains(&pdf, "(AED 240.00)"));
        assert!(contains(&pdf, "(18 October 2026)"));
        assert!(contains(&pdf, "(Gift wrap please)"));
        assert!(contains(&pdf, "(hello@maisonoud.example)"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let order = summary(vec![item(1), item(2), item(3)]);
        assert_eq!(
            render_invoice(&order, &profile()),
            render_invoice(&order, &profile())
        );
    }

    #[test]
    fn missing_total_renders_zero() {
        let mut order = summary(vec![item(1)]);
        order.total = None;
        let pdf = render_invoice(&order, &profile());
        assert!(contains(&pdf, "(AED 0.00)"));
        assert!(!contains(&pdf, "NaN"));
    }

    #[test]
    fn long_address_is_wrapped_onto_several_lines() {
        let pdf = render_invoice(&summary(vec![item(1)]), &profile());
        assert!(!contains(
            &pdf,
            "(Apartment 1204, Marina Gate Tower 2, Dubai Marina, Dubai, United Arab Emirates)"
        ));
        assert!(contains(&pdf, "(Apartment 1204, Marina Gate Tower 2,"));
    }

    #[test]
    fn overflowing_items_fold_into_a_summary_row() {
        let items: Vec<_> = (1..=40).map(item).collect();
        let pdf = render_invoice(&summary(items), &profile());
        assert!(contains(&pdf, "Scent 1 "));
        assert!(!contains(&pdf, "Scent 40 "));
        assert!(contains(&pdf, "more items)"));
        assert!(contains(&pdf, "(AED 4800.00)"));
    }

    #[test]
    fn optional_client_fields_are_skipped() {
        let mut order = summary(vec![item(1)]);
        order.customer.email = None;
        order.customer.address = None;
        order.customer.notes = None;
        let pdf = render_invoice(&order, &profile());
        assert!(!contains(&pdf, "(NOTES)"));
        assert!(!contains(&pdf, "example.com"));
    }

    #[test]
    fn long_contact_details_stay_inside_the_client_column() {
        let mut order = summary(vec![item(1)]);
        let email = format!("{}@maisonoud-private-clients.example", "layla.haddad".repeat(4));
        order.customer.email = Some(email.clone());
        order.customer.phone =
            "+971 55 000 1111 ext. 4000 (evenings only, ask for Layla)".to_string();

        let pdf = render_invoice(&order, &profile());
        assert!(!contains(&pdf, &email));
        assert!(contains(&pdf, "layla.haddadlayla.haddad"));
        assert!(!contains(&pdf, "ask for Layla"));
        assert!(contains(&pdf, "+971 55 000 1111"));
    }
}
