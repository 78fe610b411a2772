/// Surface the running total is projected onto
pub trait TotalDisplay {
    fn show(&mut self, total: f64);
}

impl<T: TotalDisplay + ?Sized> TotalDisplay for &mut T {
    fn show(&mut self, total: f64) {
        (**self).show(total)
    }
}

/// Render a total the way receipts are read back: `12`, `12.5`, `NaN`
pub fn format_total(total: f64) -> String {
    if total.is_nan() {
        "NaN".to_string()
    } else if total.is_infinite() {
        if total > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if total == 0.0 {
        // also folds -0
        "0".to_string()
    } else {
        total.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(0.0), "0");
        assert_eq!(format_total(-0.0), "0");
        assert_eq!(format_total(12.0), "12");
        assert_eq!(format_total(12.5), "12.5");
        assert_eq!(format_total(-3.25), "-3.25");
        assert_eq!(format_total(f64::NAN), "NaN");
        assert_eq!(format_total(f64::INFINITY), "Infinity");
    }
}
