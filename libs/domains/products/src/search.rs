//! Request validation for `GET /products`.
//!
//! Query parameters arrive as optional strings ([`ProductSearchQuery`]) so that
//! type errors can be reported per field instead of as a single extractor
//! rejection. [`ProductSearch::from_query`] normalises, parses and validates
//! them in one pass and reports every failing field at once.

use serde::Deserialize;
use std::borrow::Cow;
use std::str::FromStr;
use utoipa::IntoParams;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::SortOption;

pub const DEFAULT_PER_PAGE: i64 = 15;

/// Raw query string of `GET /products`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchQuery {
    /// Substring of the product name, case-insensitive (max 255 characters)
    pub q: Option<String>,
    /// Minimum price, inclusive
    #[param(value_type = Option<f64>, minimum = 0)]
    pub price_from: Option<String>,
    /// Maximum price, inclusive; must not be below `price_from`
    #[param(value_type = Option<f64>, minimum = 0)]
    pub price_to: Option<String>,
    /// Id of an existing category
    #[param(value_type = Option<i64>)]
    pub category_id: Option<String>,
    /// `true`, `false`, `1` or `0`
    #[param(value_type = Option<bool>)]
    pub in_stock: Option<String>,
    /// Minimum rating, 0 to 5
    #[param(value_type = Option<f64>, minimum = 0, maximum = 5)]
    pub rating_from: Option<String>,
    /// Sort order, defaults to `newest`
    #[param(value_type = Option<SortOption>)]
    pub sort: Option<String>,
    /// Page size, 1 to 100, defaults to 15
    #[param(value_type = Option<i64>, minimum = 1, maximum = 100)]
    pub per_page: Option<String>,
    /// 1-based page number, defaults to 1
    #[param(value_type = Option<i64>, minimum = 1)]
    pub page: Option<String>,
}

/// Normalised and validated search parameters.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductSearch {
    #[validate(length(max = 255, message = "The q field must not be greater than 255 characters."))]
    pub q: Option<String>,
    #[validate(range(min = 0.0, message = "The price from field must be at least 0."))]
    pub price_from: Option<f64>,
    #[validate(range(min = 0.0, message = "The price to field must be at least 0."))]
    pub price_to: Option<f64>,
    pub category_id: Option<i64>,
    pub in_stock: Option<bool>,
    #[validate(range(
        min = 0.0,
        max = 5.0,
        message = "The rating from field must be between 0 and 5."
    ))]
    pub rating_from: Option<f64>,
    pub sort: SortOption,
    #[validate(range(
        min = 1,
        max = 100,
        message = "The per page field must be between 1 and 100."
    ))]
    pub per_page: i64,
    #[validate(range(min = 1, message = "The page field must be at least 1."))]
    pub page: i64,
}

impl Default for ProductSearch {
    fn default() -> Self {
        Self {
            q: None,
            price_from: None,
            price_to: None,
            category_id: None,
            in_stock: None,
            rating_from: None,
            sort: SortOption::default(),
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl ProductSearch {
    /// Normalises, parses and validates the raw query.
    ///
    /// Blank values count as absent, so `sort=` and `per_page=` fall back to
    /// their defaults. All field errors are collected before returning.
    pub fn from_query(raw: &ProductSearchQuery) -> Result<Self, ValidationErrors> {
        let mut parse_errors: Vec<(&'static str, ValidationError)> = Vec::new();

        let q = present(&raw.q);
        let price_from =
            parse_field("price_from", &raw.price_from, parse_number, &mut parse_errors);
        let price_to = parse_field("price_to", &raw.price_to, parse_number, &mut parse_errors);
        let category_id =
            parse_field("category_id", &raw.category_id, parse_integer, &mut parse_errors);
        let in_stock = parse_field("in_stock", &raw.in_stock, parse_boolean, &mut parse_errors);
        let rating_from =
            parse_field("rating_from", &raw.rating_from, parse_number, &mut parse_errors);
        let sort =
            parse_field("sort", &raw.sort, parse_sort, &mut parse_errors).unwrap_or_default();
        let per_page = parse_field("per_page", &raw.per_page, parse_integer, &mut parse_errors)
            .unwrap_or(DEFAULT_PER_PAGE);
        let page = parse_field("page", &raw.page, parse_integer, &mut parse_errors).unwrap_or(1);

        let search = Self {
            q,
            price_from,
            price_to,
            category_id,
            in_stock,
            rating_from,
            sort,
            per_page,
            page,
        };

        let mut errors = search.validate().err().unwrap_or_else(ValidationErrors::new);
        for (name, error) in parse_errors {
            errors.add(name, error);
        }

        if let (Some(from), Some(to)) = (search.price_from, search.price_to)
            && to < from
        {
            let mut error = ValidationError::new("gte").with_message(Cow::Borrowed(
                "The price to field must be greater than or equal to price from.",
            ));
            error.add_param(Cow::Borrowed("value"), &to);
            error.add_param(Cow::Borrowed("other"), &from);
            errors.add("price_to", error);
        }

        if errors.is_empty() {
            Ok(search)
        } else {
            Err(errors)
        }
    }

    /// Names of the filters the caller supplied, in a fixed order.
    ///
    /// Falsy values (`in_stock=false`, `price_from=0`) still count as supplied.
    pub fn filters_applied(&self) -> Vec<&'static str> {
        [
            ("q", self.q.is_some()),
            ("price_from", self.price_from.is_some()),
            ("price_to", self.price_to.is_some()),
            ("category_id", self.category_id.is_some()),
            ("in_stock", self.in_stock.is_some()),
            ("rating_from", self.rating_from.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, supplied)| supplied.then_some(name))
        .collect()
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn parse_field<T>(
    name: &'static str,
    value: &Option<String>,
    parse: fn(&str) -> Result<T, ValidationError>,
    errors: &mut Vec<(&'static str, ValidationError)>,
) -> Option<T> {
    let value = present(value)?;
    match parse(&value) {
        Ok(parsed) => Some(parsed),
        Err(mut error) => {
            let attribute = name.replace('_', " ");
            if let Some(message) = error.message.take() {
                error.message = Some(Cow::Owned(message.replace(":attribute", &attribute)));
            }
            error.add_param(Cow::Borrowed("value"), &value);
            errors.push((name, error));
            None
        }
    }
}

fn parse_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn parse_number(value: &str) -> Result<f64, ValidationError> {
    f64::from_str(value)
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| parse_error("numeric", "The :attribute field must be a number."))
}

fn parse_integer(value: &str) -> Result<i64, ValidationError> {
    i64::from_str(value)
        .map_err(|_| parse_error("integer", "The :attribute field must be an integer."))
}

fn parse_boolean(value: &str) -> Result<bool, ValidationError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(parse_error("boolean", "The :attribute field must be true or false.")),
    }
}

fn parse_sort(value: &str) -> Result<SortOption, ValidationError> {
    SortOption::from_str(value)
        .map_err(|_| parse_error("in", "The selected :attribute is invalid."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ProductSearchQuery {
        let mut raw = ProductSearchQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "q" => raw.q = value,
                "price_from" => raw.price_from = value,
                "price_to" => raw.price_to = value,
                "category_id" => raw.category_id = value,
                "in_stock" => raw.in_stock = value,
                "rating_from" => raw.rating_from = value,
                "sort" => raw.sort = value,
                "per_page" => raw.per_page = value,
                "page" => raw.page = value,
                other => panic!("unknown key {other}"),
            }
        }
        raw
    }

    fn error_codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_defaults_when_nothing_supplied() {
        let search = ProductSearch::from_query(&ProductSearchQuery::default()).unwrap();
        assert_eq!(search, ProductSearch::default());
        assert_eq!(search.sort, SortOption::Newest);
        assert_eq!(search.per_page, 15);
        assert_eq!(search.page, 1);
        assert!(search.filters_applied().is_empty());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let search =
            ProductSearch::from_query(&query(&[("sort", ""), ("per_page", " "), ("q", "")]))
                .unwrap();
        assert_eq!(search.sort, SortOption::Newest);
        assert_eq!(search.per_page, 15);
        assert_eq!(search.q, None);
    }

    #[test]
    fn test_parses_every_field() {
        let search = ProductSearch::from_query(&query(&[
            ("q", " iPhone "),
            ("price_from", "100"),
            ("price_to", "99999.99"),
            ("category_id", "1"),
            ("in_stock", "0"),
            ("rating_from", "4.5"),
            ("sort", "price_desc"),
            ("per_page", "5"),
            ("page", "2"),
        ]))
        .unwrap();

        assert_eq!(search.q.as_deref(), Some("iPhone"));
        assert_eq!(search.price_from, Some(100.0));
        assert_eq!(search.price_to, Some(99999.99));
        assert_eq!(search.category_id, Some(1));
        assert_eq!(search.in_stock, Some(false));
        assert_eq!(search.rating_from, Some(4.5));
        assert_eq!(search.sort, SortOption::PriceDesc);
        assert_eq!(search.per_page, 5);
        assert_eq!(search.page, 2);
    }

    #[test]
    fn test_filters_applied_keeps_falsy_values_in_fixed_order() {
        let search = ProductSearch::from_query(&query(&[
            ("in_stock", "false"),
            ("price_from", "0"),
            ("sort", "rating_desc"),
        ]))
        .unwrap();
        assert_eq!(search.filters_applied(), vec!["price_from", "in_stock"]);
    }

    #[test]
    fn test_type_errors_are_reported_per_field() {
        let errors = ProductSearch::from_query(&query(&[
            ("price_from", "cheap"),
            ("category_id", "1.5"),
            ("in_stock", "yes"),
            ("sort", "popular"),
            ("rating_from", "NaN"),
        ]))
        .unwrap_err();

        assert_eq!(error_codes(&errors, "price_from"), ["numeric"]);
        assert_eq!(error_codes(&errors, "category_id"), ["integer"]);
        assert_eq!(error_codes(&errors, "in_stock"), ["boolean"]);
        assert_eq!(error_codes(&errors, "sort"), ["in"]);
        assert_eq!(error_codes(&errors, "rating_from"), ["numeric"]);

        let field_errors = errors.field_errors();
        let sort_error = &field_errors["sort"][0];
        assert_eq!(sort_error.message.as_deref(), Some("The selected sort is invalid."));
        assert_eq!(sort_error.params["value"], "popular");
    }

    #[test]
    fn test_range_errors() {
        let errors = ProductSearch::from_query(&query(&[
            ("rating_from", "6"),
            ("price_from", "-1"),
            ("per_page", "101"),
            ("page", "0"),
        ]))
        .unwrap_err();

        assert_eq!(error_codes(&errors, "rating_from"), ["range"]);
        assert_eq!(error_codes(&errors, "price_from"), ["range"]);
        assert_eq!(error_codes(&errors, "per_page"), ["range"]);
        assert_eq!(error_codes(&errors, "page"), ["range"]);
    }

    #[test]
    fn test_per_page_bounds_are_inclusive() {
        assert!(ProductSearch::from_query(&query(&[("per_page", "1")])).is_ok());
        assert!(ProductSearch::from_query(&query(&[("per_page", "100")])).is_ok());
        assert!(ProductSearch::from_query(&query(&[("per_page", "0")])).is_err());
    }

    #[test]
    fn test_q_longer_than_255_is_rejected() {
        let long = "a".repeat(256);
        let errors = ProductSearch::from_query(&query(&[("q", &long)])).unwrap_err();
        assert_eq!(error_codes(&errors, "q"), ["length"]);
        assert!(ProductSearch::from_query(&query(&[("q", &"a".repeat(255))])).is_ok());
    }

    #[test]
    fn test_price_to_below_price_from_is_rejected() {
        let errors =
            ProductSearch::from_query(&query(&[("price_from", "500"), ("price_to", "100")]))
                .unwrap_err();
        assert_eq!(error_codes(&errors, "price_to"), ["gte"]);
        assert!(error_codes(&errors, "price_from").is_empty());

        assert!(
            ProductSearch::from_query(&query(&[("price_from", "100"), ("price_to", "100")]))
                .is_ok()
        );
    }

    #[test]
    fn test_type_and_range_errors_are_combined() {
        let errors = ProductSearch::from_query(&query(&[("in_stock", "maybe"), ("page", "-3")]))
            .unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }
}
