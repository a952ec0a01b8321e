//! The fixed roster of eligible candidates.

const ROSTER: &[(&str, &str)] = &[
    ("Mahim Gupta", "mahimgupta@jklu.edu.in"),
    ("Aman Gupta", "amangupta2024@jklu.edu.in"),
    ("Yash Bansal", "yashbansal@jklu.edu.in"),
    ("Devam Gupta", "devamgupta@jklu.edu.in"),
    ("Ayush Sharma", "ayushsharma2024@jklu.edu.in"),
    ("Atharv Mehrotra", "atharvmehrotra@jklu.edu.in"),
    ("Somay Agarwal", "somayagarwal@jklu.edu.in"),
    ("Aditya Nayak", "adityanayak@jklu.edu.in"),
    ("Priyanshu Jain", "priyanshujain@jklu.edu.in"),
    ("Aman Pratap Singh", "amanpratapsingh@jklu.edu.in"),
    ("Divyanshi Gupta", "Divyanshigupta@jklu.edu.in"),
    ("Yash Mishra", "yashmishra2024@jklu.edu.in"),
    ("Prateek Saxena", "pksaxena6453@gmail.com"),
];

#[derive(Debug, Clone, Copy)]
pub struct Roster {
    entries: &'static [(&'static str, &'static str)],
}

impl Default for Roster {
    fn default() -> Self {
        Roster { entries: ROSTER }
    }
}

impl Roster {
    /// Email for `name`, matched after title-casing.
    pub fn lookup(&self, name: &str) -> Option<&'static str> {
        let wanted = title_case(name);
        self.entries
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, email)| *email)
    }

    /// Roster names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest,
/// so `"mAHIM gUPTA"` becomes `"Mahim Gupta"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
