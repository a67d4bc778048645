//! Some utility functions

use crate::Item;

/// A debug utility that pretty-prints a list of items
pub fn print_list(items: &[Item]) {
    if items.is_empty() {
        println!("    (no items)");
    }
    for (index, item) in items.iter().enumerate() {
        print_item(index, item);
    }
}

pub fn print_item(index: usize, item: &Item) {
    println!("    {:>3}. {}\t{}", index, item, item.id());
}
