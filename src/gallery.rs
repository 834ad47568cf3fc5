//! Example passages offered under the input form.

/// A context passage with a question about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Example {
    pub context: &'static str,
    pub question: &'static str,
}

const EXAMPLES: &[Example] = &[
    Example {
        context: "The Amazon rainforest, also known as Amazonia, covers 5.5 million square kilometers. It represents over half of the planet's remaining rainforests and comprises the largest and most biodiverse tract of tropical rainforest in the world.",
        question: "How large is the Amazon rainforest?",
    },
    Example {
        context: "The Eiffel Tower was designed by Gustave Eiffel and completed in 1889. It stands 324 meters tall and was the world's tallest structure until the Chrysler Building was built in 1930.",
        question: "When was the Eiffel Tower completed?",
    },
    Example {
        context: "Python was created by Guido van Rossum and first released in 1991. Python's design philosophy emphasizes code readability with its notable use of significant indentation.",
        question: "Who created Python?",
    },
    Example {
        context: "The Pacific Ocean is the largest and deepest of Earth's five oceanic divisions. It extends from the Arctic Ocean in the north to the Southern Ocean in the south and is bounded by the continents of Asia and Australia in the west and the Americas in the east.",
        question: "Which ocean is the largest?",
    },
];

pub fn examples() -> &'static [Example] {
    EXAMPLES
}

pub fn example(index: usize) -> Option<&'static Example> {
    EXAMPLES.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_examples() {
        assert_eq!(examples().len(), 4);
    }

    #[test]
    fn example_lookup() {
        assert_eq!(example(2).unwrap().question, "Who created Python?");
        assert!(example(4).is_none());
    }

    #[test]
    fn examples_are_non_empty() {
        for e in examples() {
            assert!(!e.context.trim().is_empty());
            assert!(e.question.ends_with('?'));
        }
    }
}
