//! Reply addresses of cars.

use std::collections::HashMap;

use crate::domain::{CarId, ReplyAddress};

/// Map from car to the address its last report came from.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    addresses: HashMap<CarId, ReplyAddress>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reply address of a car, replacing any previous one.
    pub fn record(&mut self, car: CarId, address: ReplyAddress) {
        self.addresses.insert(car, address);
    }

    pub fn get(&self, car: &str) -> Option<&ReplyAddress> {
        self.addresses.get(car)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_replace() {
        let mut book = AddressBook::new();
        assert!(book.is_empty());

        book.record(CarId::new("a"), ReplyAddress::new("a#1"));
        book.record(CarId::new("a"), ReplyAddress::new("a#2"));

        assert_eq!(book.len(), 1);
        assert_eq!(book.get("a").map(|a| a.as_str()), Some("a#2"));
        assert!(book.get("b").is_none());
    }
}
