//! Inventory strings
//!
//! An inventory string lists items separated by `%%`. Each item is a
//! material, optional comma separated modifiers, then a slot section after
//! the first top-level `:` that is not part of a namespaced id:
//!
//! ```text
//! diamond_sword,enchant:1            one item in slot 1
//! stone:3,16                         slot 3 holding 16
//! oak_log:[1,2,5-7]4                 slots 1, 2 and 5 to 7 holding 4 each
//! minecraft:dirt:{1:2,4-5:64}        per-slot amounts
//! diamond_pickaxe,35:9               durability 35%
//! ```
//!
//! Slots are 1-indexed and fitted into the inventory; amounts are fitted
//! into `1..=64`. A trailing integer modifier is the durability percentage.

use crate::error::{GeneratorError, GeneratorResult};
use std::collections::HashSet;

pub const ITEM_SEPARATOR: &str = "%%";
pub const MAX_STACK: u32 = 64;

/// One inventory entry and the slots it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub material: String,
    /// 1-indexed slots, paired with `amounts`
    pub slots: Vec<u32>,
    pub amounts: Vec<u32>,
    /// Comma separated modifiers such as `enchant` or a dye name
    pub data: Option<String>,
    pub durability: Option<u8>,
}

impl InventoryItem {
    /// Modifier tokens, trimmed and lowercased.
    pub fn modifiers(&self) -> Vec<String> {
        self.data
            .as_deref()
            .map(|d| d.split(',').map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }

    /// `(slot, amount)` pairs.
    pub fn placements(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.slots.iter().copied().zip(self.amounts.iter().copied())
    }
}

/// Parses inventory strings for an inventory of `total_slots` slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryParser {
    total_slots: u32,
}

impl InventoryParser {
    pub fn new(total_slots: u32) -> Self {
        Self { total_slots: total_slots.max(1) }
    }

    /// Parse every item in `input`.
    ///
    /// When two neighbouring items claim the same slot, the later one keeps
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Validation`] for an item without a slot
    /// separator or with slot data that cannot be read.
    ///
    /// # Examples
    ///
    /// ```
    /// use tooltipgen::inventory::InventoryParser;
    ///
    /// let items = InventoryParser::new(9).parse("stone:1,32%%dirt:[2-3]").unwrap();
    /// assert_eq!(items[0].amounts, vec![32]);
    /// assert_eq!(items[1].slots, vec![2, 3]);
    /// ```
    pub fn parse(&self, input: &str) -> GeneratorResult<Vec<InventoryItem>> {
        let mut items = Vec::new();
        for raw in input.split(ITEM_SEPARATOR) {
            let item = raw.trim();
            if item.is_empty() {
                continue;
            }
            items.push(self.parse_item(item)?);
        }
        trim_overlaps(&mut items);
        Ok(items)
    }

    fn parse_item(&self, item: &str) -> GeneratorResult<InventoryItem> {
        let separator = find_slot_separator(item).ok_or_else(|| {
            GeneratorError::validation(format!(
                "Incorrect amount of components present in item: `{item}` (missing a valid slot separator `:`)"
            ))
        })?;
        let (head, slot_data) = (item[..separator].trim(), item[separator + 1..].trim());
        let (material, data, durability) = split_modifiers(head);

        let (slots, amounts) = if slot_data.contains('{') {
            self.slots_from_map(slot_data, &material)?
        } else if slot_data.contains('[') {
            self.slots_from_array(slot_data)?
        } else {
            self.slot_with_amount(slot_data, &material)?
        };

        Ok(InventoryItem { material, slots, amounts, data, durability })
    }

    /// `{1:4,2-3:16}`
    fn slots_from_map(&self, slot_data: &str, material: &str) -> GeneratorResult<(Vec<u32>, Vec<u32>)> {
        let inner = slot_data.trim_start_matches('{');
        let inner = inner.split('}').next().unwrap_or(inner);

        let mut slots = Vec::new();
        let mut amounts = Vec::new();
        for pair in inner.split(',') {
            let parts: Vec<&str> = pair.split(':').collect();
            let [slot, amount] = parts.as_slice() else {
                return Err(GeneratorError::validation(format!(
                    "Invalid slot or amount format: `{}` in slot data: `{slot_data}` for material: `{material}`",
                    pair.trim()
                )));
            };
            let amount = parse_number(amount)
                .map(fit_amount)
                .ok_or_else(|| GeneratorError::validation(format!("Invalid amount: `{}`", amount.trim())))?;
            for slot in self.slot_range(slot)? {
                slots.push(slot);
                amounts.push(amount);
            }
        }
        Ok((slots, amounts))
    }

    /// `[1,2,5-7]` with an optional amount after the bracket.
    fn slots_from_array(&self, slot_data: &str) -> GeneratorResult<(Vec<u32>, Vec<u32>)> {
        let inner = slot_data.trim_start_matches('[');
        let (inner, amount) = match inner.split_once(']') {
            Some((inner, rest)) => {
                let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
                (inner, parse_number(&digits).map(fit_amount).unwrap_or(1))
            }
            None => (inner, 1),
        };

        let slots = self.slot_range(inner)?;
        let amounts = vec![amount; slots.len()];
        Ok((slots, amounts))
    }

    /// `slot` or `slot,amount`.
    fn slot_with_amount(&self, slot_data: &str, material: &str) -> GeneratorResult<(Vec<u32>, Vec<u32>)> {
        let (slot, amount) = match slot_data.split_once(',') {
            Some((slot, amount)) => (slot, parse_number(amount).map(fit_amount).unwrap_or(1)),
            None => (slot_data, 1),
        };
        let slot = parse_number(slot).map(|s| self.fit_slot(s)).ok_or_else(|| {
            GeneratorError::validation(format!("Invalid slot or amount: `{slot_data}` for material: `{material}`"))
        })?;
        Ok((vec![slot], vec![amount]))
    }

    /// Comma separated slots and `a-b` ranges.
    fn slot_range(&self, value: &str) -> GeneratorResult<Vec<u32>> {
        let mut slots = Vec::new();
        for part in value.split(',').map(str::trim) {
            if part.contains('-') {
                let bounds: Vec<&str> = part.split('-').collect();
                let [start, end] = bounds.as_slice() else {
                    return Err(GeneratorError::validation(format!("Invalid range format: `{part}`")));
                };
                let (Some(start), Some(end)) = (parse_number(start), parse_number(end)) else {
                    return Err(GeneratorError::validation(format!("Invalid range format: `{part}`")));
                };
                let (start, end) = (self.fit_slot(start), self.fit_slot(end));
                if start > end {
                    return Err(GeneratorError::validation(format!(
                        "Start slot cannot be greater than end slot in range: `{part}`"
                    )));
                }
                slots.extend(start..=end);
            } else {
                let slot = parse_number(part)
                    .ok_or_else(|| GeneratorError::validation(format!("Invalid slot: `{part}`")))?;
                slots.push(self.fit_slot(slot));
            }
        }
        Ok(slots)
    }

    fn fit_slot(&self, slot: i64) -> u32 {
        slot.clamp(1, self.total_slots as i64) as u32
    }
}

fn parse_number(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn fit_amount(amount: i64) -> u32 {
    amount.clamp(1, MAX_STACK as i64) as u32
}

/// Material, joined modifiers and a trailing durability.
fn split_modifiers(head: &str) -> (String, Option<String>, Option<u8>) {
    let mut parts = head.split(',').map(str::trim);
    let material = parts.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = parts.collect();

    let mut durability = None;
    let mut modifiers = Vec::new();
    for (i, part) in rest.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        match part.parse::<i64>() {
            Ok(value) if i + 1 == rest.len() => durability = Some(value.clamp(0, 100) as u8),
            _ => modifiers.push(*part),
        }
    }

    let data = (!modifiers.is_empty()).then(|| modifiers.join(","));
    (material, data, durability)
}

/// Index of the `:` that starts the slot section.
///
/// Colons inside `{}` or `[]` and colons followed by a letter, as in
/// `minecraft:stone`, are skipped.
fn find_slot_separator(item: &str) -> Option<usize> {
    let mut braces = 0usize;
    let mut brackets = 0usize;

    for (i, c) in item.char_indices() {
        match c {
            '{' => braces += 1,
            '}' => braces = braces.saturating_sub(1),
            '[' => brackets += 1,
            ']' => brackets = brackets.saturating_sub(1),
            ':' if braces == 0 && brackets == 0 => {
                let next = item[i + 1..].chars().find(|c| !c.is_whitespace())?;
                if !next.is_alphabetic() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop slots an item shares with the item after it.
fn trim_overlaps(items: &mut [InventoryItem]) {
    for i in 1..items.len() {
        let taken: HashSet<u32> = items[i].slots.iter().copied().collect();
        let item = &mut items[i - 1];
        if !item.slots.iter().any(|s| taken.contains(s)) {
            continue;
        }
        let kept: Vec<(u32, u32)> = item.placements().filter(|(slot, _)| !taken.contains(slot)).collect();
        item.slots = kept.iter().map(|(slot, _)| *slot).collect();
        item.amounts = kept.iter().map(|(_, amount)| *amount).collect();
    }
}
