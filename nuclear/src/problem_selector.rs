use std::{collections::VecDeque, io::BufRead, panic};

/// Gets the arguments from the command line without the program name.
pub fn get_args() -> VecDeque<String> {
    std::env::args().skip(1).collect()
}

/// Trait for selecting one of the demo problems of a binary.
pub trait ProblemSelector {
    /// Name of the problem group.
    const NAME: &'static str;

    /// Names of all available problems, in selection order.
    fn list() -> Vec<&'static str>;

    /// Runs the problem with the given index, returns `false` if there is no such problem.
    fn methods(number: usize, args: &mut VecDeque<String>) -> bool;

    /// Select a problem from the first argument or, when absent, from standard input.
    /// "-1" runs every problem of the group, each isolated from panics of the others.
    fn select(args: &mut VecDeque<String>) {
        let choice = match args.pop_front() {
            Some(arg) => arg,
            None => {
                println!("{}: provide a problem number", Self::NAME);
                println!("-1: run all problems");
                for (i, problem) in Self::list().iter().enumerate() {
                    println!("{i}: {problem}");
                }

                let mut input = String::new();
                if std::io::stdin().lock().read_line(&mut input).is_err() {
                    println!("could not read the problem number");
                    return;
                }
                input.trim().to_string()
            }
        };

        if choice == "-1" {
            for i in 0..Self::list().len() {
                let mut args = args.clone();
                if panic::catch_unwind(move || Self::methods(i, &mut args)).is_err() {
                    println!("Problem {i} failed");
                }
            }
            return;
        }

        match choice.parse::<usize>() {
            Ok(number) if Self::methods(number, args) => {}
            _ => println!("{}: no problem {choice:?}", Self::NAME),
        }
    }
}

#[macro_export]
macro_rules! problems_impl {
    ($selector:ty, $name:expr, $($problem_type:expr => $method:expr),* $(,)?) => {
        impl $crate::problem_selector::ProblemSelector for $selector {
            const NAME: &'static str = $name;

            fn list() -> Vec<&'static str> {
                vec![$($problem_type),*]
            }

            #[allow(unused_assignments)]
            fn methods(number: usize, args: &mut std::collections::VecDeque<String>) -> bool {
                let mut index = 0;
                $(
                    if index == number {
                        println!("Chose problem: {}", Self::list()[number]);
                        ($method)(args);
                        return true;
                    }
                    index += 1;
                )*

                false
            }
        }
    };
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    use crate::problem_selector::ProblemSelector;

    struct TestProblems;

    problems_impl!(TestProblems, "test",
        "first" => |_| println!("first"),
        "second" => |args: &mut VecDeque<String>| args.push_back("visited".to_string()),
    );

    #[test]
    fn problem_selector() {
        assert_eq!(TestProblems::list(), vec!["first", "second"]);

        let mut args = VecDeque::new();
        assert!(TestProblems::methods(1, &mut args));
        assert_eq!(args, VecDeque::from(vec!["visited".to_string()]));

        assert!(!TestProblems::methods(2, &mut args));
    }
}
