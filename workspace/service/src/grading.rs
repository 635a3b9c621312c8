//! Percentage and letter-grade derivation. Pure functions of the stored
//! `grade_value` and `max_points`.

use common::LetterGrade;

/// Score as a percentage of `max_points`; 0 when the scale is not positive.
pub fn percentage(grade_value: f64, max_points: f64) -> f64 {
    if max_points > 0.0 {
        grade_value * 100.0 / max_points
    } else {
        0.0
    }
}

/// Band of a percentage. Each boundary belongs to the higher band.
pub fn letter_for_percentage(percentage: f64) -> LetterGrade {
    if percentage >= 90.0 {
        LetterGrade::A
    } else if percentage >= 80.0 {
        LetterGrade::B
    } else if percentage >= 70.0 {
        LetterGrade::C
    } else if percentage >= 60.0 {
        LetterGrade::D
    } else {
        LetterGrade::F
    }
}

pub fn letter_grade(grade_value: f64, max_points: f64) -> LetterGrade {
    letter_for_percentage(percentage(grade_value, max_points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_from_the_grade_scale() {
        assert_eq!(letter_grade(92.0, 100.0), LetterGrade::A);
        assert_eq!(letter_grade(81.0, 100.0), LetterGrade::B);
        assert_eq!(letter_grade(75.0, 100.0), LetterGrade::C);
        assert_eq!(letter_grade(60.5, 100.0), LetterGrade::D);
        assert_eq!(letter_grade(55.0, 100.0), LetterGrade::F);
    }

    #[test]
    fn test_boundaries_map_to_higher_band() {
        assert_eq!(letter_for_percentage(90.0), LetterGrade::A);
        assert_eq!(letter_for_percentage(89.999), LetterGrade::B);
        assert_eq!(letter_for_percentage(80.0), LetterGrade::B);
        assert_eq!(letter_for_percentage(70.0), LetterGrade::C);
        assert_eq!(letter_for_percentage(60.0), LetterGrade::D);
        assert_eq!(letter_for_percentage(59.999), LetterGrade::F);
    }

    #[test]
    fn test_scale_other_than_hundred() {
        assert_eq!(percentage(45.0, 50.0), 90.0);
        assert_eq!(letter_grade(45.0, 50.0), LetterGrade::A);
        assert_eq!(letter_grade(7.0, 10.0), LetterGrade::C);
    }

    #[test]
    fn test_non_positive_scale_is_zero_percent() {
        assert_eq!(percentage(10.0, 0.0), 0.0);
        assert_eq!(letter_grade(10.0, 0.0), LetterGrade::F);
    }
}
